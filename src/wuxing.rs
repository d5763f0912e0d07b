// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Five elements (Wu Xing) and yin/yang polarity of stems and branches.

use crate::sexagenary::{Branch, Stem};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// One of the five phases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Element {
    Wood,
    Fire,
    Earth,
    Metal,
    Water,
}

/// Yin or yang.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Polarity {
    Yang,
    Yin,
}

/// Element of each stem, 甲 first.
const STEM_ELEMENTS: [Element; 10] = [
    Element::Wood,
    Element::Wood,
    Element::Fire,
    Element::Fire,
    Element::Earth,
    Element::Earth,
    Element::Metal,
    Element::Metal,
    Element::Water,
    Element::Water,
];

/// Element of each branch, 子 first.
const BRANCH_ELEMENTS: [Element; 12] = [
    Element::Water,
    Element::Earth,
    Element::Wood,
    Element::Wood,
    Element::Earth,
    Element::Fire,
    Element::Fire,
    Element::Earth,
    Element::Metal,
    Element::Metal,
    Element::Earth,
    Element::Water,
];

impl Element {
    pub const ALL: [Element; 5] = [
        Element::Wood,
        Element::Fire,
        Element::Earth,
        Element::Metal,
        Element::Water,
    ];

    /// 木, 火, 土, 金 or 水.
    pub const fn chinese(self) -> &'static str {
        match self {
            Element::Wood => "木",
            Element::Fire => "火",
            Element::Earth => "土",
            Element::Metal => "金",
            Element::Water => "水",
        }
    }
}

impl std::fmt::Display for Element {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.chinese())
    }
}

impl Polarity {
    /// 阳 or 阴.
    pub const fn chinese(self) -> &'static str {
        match self {
            Polarity::Yang => "阳",
            Polarity::Yin => "阴",
        }
    }
}

#[inline]
pub const fn stem_element(stem: Stem) -> Element {
    STEM_ELEMENTS[stem.index() as usize]
}

#[inline]
pub const fn branch_element(branch: Branch) -> Element {
    BRANCH_ELEMENTS[branch.index() as usize]
}

/// Even positions in either cycle are yang.
#[inline]
pub const fn stem_polarity(stem: Stem) -> Polarity {
    if stem.index() % 2 == 0 {
        Polarity::Yang
    } else {
        Polarity::Yin
    }
}

#[inline]
pub const fn branch_polarity(branch: Branch) -> Polarity {
    if branch.index() % 2 == 0 {
        Polarity::Yang
    } else {
        Polarity::Yin
    }
}

/// A cycle term with a fixed element.
pub trait HasElement: Copy {
    fn element(self) -> Element;
}

impl HasElement for Stem {
    fn element(self) -> Element {
        stem_element(self)
    }
}

impl HasElement for Branch {
    fn element(self) -> Element {
        branch_element(self)
    }
}

/// Element of a stem or a branch.
pub fn element_of<T: HasElement>(term: T) -> Element {
    term.element()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stems_pair_up_by_element() {
        let expected = "木木火火土土金金水水";
        let got: String = Stem::ALL.iter().map(|s| stem_element(*s).chinese()).collect();
        assert_eq!(got, expected);
    }

    #[test]
    fn branch_elements() {
        use Element::*;
        assert_eq!(branch_element(Branch::Zi), Water);
        assert_eq!(branch_element(Branch::Hai), Water);
        assert_eq!(branch_element(Branch::Yin), Wood);
        assert_eq!(branch_element(Branch::Wu), Fire);
        assert_eq!(branch_element(Branch::You), Metal);
        for earth in [Branch::Chou, Branch::Chen, Branch::Wei, Branch::Xu] {
            assert_eq!(branch_element(earth), Earth);
        }
    }

    #[test]
    fn element_of_either_kind() {
        assert_eq!(element_of(Stem::Geng), Element::Metal);
        assert_eq!(element_of(Branch::Wei), Element::Earth);
    }

    #[test]
    fn polarity_alternates() {
        assert_eq!(stem_polarity(Stem::Jia), Polarity::Yang);
        assert_eq!(stem_polarity(Stem::Gui), Polarity::Yin);
        assert_eq!(branch_polarity(Branch::Zi), Polarity::Yang);
        assert_eq!(branch_polarity(Branch::Hai), Polarity::Yin);
        assert_eq!(Polarity::Yang.chinese(), "阳");
        assert_eq!(Polarity::Yin.chinese(), "阴");
    }
}
