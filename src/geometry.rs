//! Deck vocabulary (suits, ranks, card positions) and the fixed geometry
//! every component renders against.

use std::fmt;

use image::Rgba;

/// Number of cards in a full deck.
pub const DECK_SIZE: usize = 52;

/// The four suits, declared in canonical deck order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Suit {
    Heart,
    Diamond,
    Club,
    Spade,
}

impl Suit {
    pub const ALL: [Suit; 4] = [Suit::Heart, Suit::Diamond, Suit::Club, Suit::Spade];

    /// Name used in the asset file pattern (`suit-{name}*.png`).
    pub fn asset_name(self) -> &'static str {
        match self {
            Suit::Heart => "heart",
            Suit::Diamond => "diamond",
            Suit::Club => "club",
            Suit::Spade => "spades",
        }
    }

    /// Single-letter suffix used in output file names.
    pub fn abbrev(self) -> char {
        match self {
            Suit::Heart => 'H',
            Suit::Diamond => 'D',
            Suit::Club => 'C',
            Suit::Spade => 'S',
        }
    }

    pub fn is_red(self) -> bool {
        matches!(self, Suit::Heart | Suit::Diamond)
    }
}

impl fmt::Display for Suit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.asset_name())
    }
}

/// The thirteen ranks, declared in canonical deck order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Rank {
    Two,
    Three,
    Four,
    Five,
    Six,
    Seven,
    Eight,
    Nine,
    Ten,
    Jack,
    Queen,
    King,
    Ace,
}

impl Rank {
    #[rustfmt::skip]
    pub const ALL: [Rank; 13] = [
        Rank::Two, Rank::Three, Rank::Four, Rank::Five, Rank::Six, Rank::Seven, Rank::Eight,
        Rank::Nine, Rank::Ten, Rank::Jack, Rank::Queen, Rank::King, Rank::Ace,
    ];

    /// Label printed in the card corners and used in file names.
    pub fn symbol(self) -> &'static str {
        match self {
            Rank::Two => "2",
            Rank::Three => "3",
            Rank::Four => "4",
            Rank::Five => "5",
            Rank::Six => "6",
            Rank::Seven => "7",
            Rank::Eight => "8",
            Rank::Nine => "9",
            Rank::Ten => "10",
            Rank::Jack => "J",
            Rank::Queen => "Q",
            Rank::King => "K",
            Rank::Ace => "A",
        }
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// One card's identity, derived from its position in the canonical ordering
/// (suit outer loop, rank inner loop).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CardSpec {
    pub rank: Rank,
    pub suit: Suit,
    pub sequence_index: usize,
}

impl CardSpec {
    /// Card at a 0-based sequence index, or `None` past the end of the deck.
    pub fn at(sequence_index: usize) -> Option<Self> {
        if sequence_index >= DECK_SIZE {
            return None;
        }
        Some(Self {
            suit: Suit::ALL[sequence_index / Rank::ALL.len()],
            rank: Rank::ALL[sequence_index % Rank::ALL.len()],
            sequence_index,
        })
    }

    /// All 52 cards in canonical order.
    pub fn canonical() -> impl Iterator<Item = CardSpec> {
        (0..DECK_SIZE).filter_map(CardSpec::at)
    }

    /// `{prefix}_{NN}_{RANK}_{SUIT}.png` with a 1-based, zero-padded index.
    pub fn file_name(&self, prefix: &str) -> String {
        format!(
            "{}_{:02}_{}_{}.png",
            prefix,
            self.sequence_index + 1,
            self.rank.symbol(),
            self.suit.abbrev()
        )
    }
}

/// Fixed canvas sizes, colors, and insets shared by all components.
///
/// Passed by reference into each stage instead of living in module-level
/// constants, so callers (and tests) can render at any scale.
#[derive(Debug, Clone, PartialEq)]
pub struct DeckGeometry {
    /// Full card canvas: front half and back half side by side.
    pub card_size: (u32, u32),
    /// Target canvas for contour-extracted suit glyphs.
    pub suit_size: (u32, u32),
    /// Rank font size in pixels.
    pub font_size: u32,
    pub red: Rgba<u8>,
    pub black: Rgba<u8>,
    /// Offset of the corner stacks from the front image edges.
    pub corner_inset: u32,
    /// Vertical gap between rank text and corner suit; `None` means half the
    /// font size.
    pub stack_gap: Option<u32>,
}

impl Default for DeckGeometry {
    fn default() -> Self {
        Self {
            card_size: (2496, 1872),
            suit_size: (700, 700),
            font_size: 200,
            red: Rgba([255, 0, 0, 255]),
            black: Rgba([60, 60, 60, 255]),
            corner_inset: 50,
            stack_gap: None,
        }
    }
}

impl DeckGeometry {
    /// Size of the front and back artwork, each covering half the card.
    pub fn half_card_size(&self) -> (u32, u32) {
        (self.card_size.0 / 2, self.card_size.1)
    }

    pub fn suit_color(&self, suit: Suit) -> Rgba<u8> {
        if suit.is_red() { self.red } else { self.black }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashSet;

    #[test]
    fn canonical_order_is_suit_major() {
        let cards: Vec<CardSpec> = CardSpec::canonical().collect();
        assert_eq!(cards.len(), DECK_SIZE);
        assert_eq!((cards[0].suit, cards[0].rank), (Suit::Heart, Rank::Two));
        assert_eq!((cards[12].suit, cards[12].rank), (Suit::Heart, Rank::Ace));
        assert_eq!((cards[13].suit, cards[13].rank), (Suit::Diamond, Rank::Two));
        assert_eq!((cards[51].suit, cards[51].rank), (Suit::Spade, Rank::Ace));
        assert!(CardSpec::at(52).is_none());
    }

    #[test]
    fn file_names_are_unique_and_padded() {
        let names: HashSet<String> = CardSpec::canonical().map(|c| c.file_name("deck")).collect();
        assert_eq!(names.len(), DECK_SIZE);
        let first = CardSpec::at(0).map(|c| c.file_name("poker_card"));
        assert_eq!(first.as_deref(), Some("poker_card_01_2_H.png"));
        let ten_of_clubs = CardSpec::at(34).map(|c| c.file_name("p"));
        assert_eq!(ten_of_clubs.as_deref(), Some("p_35_10_C.png"));
        let last = CardSpec::at(51).map(|c| c.file_name("p"));
        assert_eq!(last.as_deref(), Some("p_52_A_S.png"));
    }

    #[test]
    fn default_geometry_matches_card_canvas() {
        let geometry = DeckGeometry::default();
        assert_eq!(geometry.half_card_size(), (1248, 1872));
        assert_eq!(geometry.suit_color(Suit::Diamond), geometry.red);
        assert_eq!(geometry.suit_color(Suit::Spade), geometry.black);
    }
}
