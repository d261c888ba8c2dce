use std::fmt;

use crate::error::{CfrError, CfrResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Rank {
    Two = 2,
    Three = 3,
    Four = 4,
    Five = 5,
    Six = 6,
    Seven = 7,
    Eight = 8,
    Nine = 9,
    Ten = 10,
    Jack = 11,
    Queen = 12,
    King = 13,
    Ace = 14,
}

impl Rank {
    pub fn from_char(c: char) -> CfrResult<Rank> {
        match c.to_ascii_uppercase() {
            '2' => Ok(Rank::Two),
            '3' => Ok(Rank::Three),
            '4' => Ok(Rank::Four),
            '5' => Ok(Rank::Five),
            '6' => Ok(Rank::Six),
            '7' => Ok(Rank::Seven),
            '8' => Ok(Rank::Eight),
            '9' => Ok(Rank::Nine),
            'T' => Ok(Rank::Ten),
            'J' => Ok(Rank::Jack),
            'Q' => Ok(Rank::Queen),
            'K' => Ok(Rank::King),
            'A' => Ok(Rank::Ace),
            _ => Err(CfrError::InvalidRank(c)),
        }
    }

    pub fn to_char(self) -> char {
        match self {
            Rank::Two => '2',
            Rank::Three => '3',
            Rank::Four => '4',
            Rank::Five => '5',
            Rank::Six => '6',
            Rank::Seven => '7',
            Rank::Eight => '8',
            Rank::Nine => '9',
            Rank::Ten => 'T',
            Rank::Jack => 'J',
            Rank::Queen => 'Q',
            Rank::King => 'K',
            Rank::Ace => 'A',
        }
    }

    pub fn value(self) -> u8 {
        self as u8
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Suit {
    Spades,
    Hearts,
    Diamonds,
    Clubs,
}

impl Suit {
    pub fn from_char(c: char) -> CfrResult<Suit> {
        match c.to_ascii_lowercase() {
            's' => Ok(Suit::Spades),
            'h' => Ok(Suit::Hearts),
            'd' => Ok(Suit::Diamonds),
            'c' => Ok(Suit::Clubs),
            _ => Err(CfrError::InvalidSuit(c)),
        }
    }

    pub fn to_char(self) -> char {
        match self {
            Suit::Spades => 's',
            Suit::Hearts => 'h',
            Suit::Diamonds => 'd',
            Suit::Clubs => 'c',
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            Suit::Spades => "\u{2660}",
            Suit::Hearts => "\u{2665}",
            Suit::Diamonds => "\u{2666}",
            Suit::Clubs => "\u{2663}",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Card {
    pub rank: Rank,
    pub suit: Suit,
}

impl Card {
    pub fn new(rank: Rank, suit: Suit) -> Card {
        Card { rank, suit }
    }

    pub fn value(&self) -> u8 {
        self.rank.value()
    }

    pub fn pretty(&self) -> String {
        format!("{}{}", self.rank.to_char(), self.suit.symbol())
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.rank.to_char(), self.suit.to_char())
    }
}

pub fn parse_card(notation: &str) -> CfrResult<Card> {
    let notation = notation.trim();
    let chars: Vec<char> = notation.chars().collect();
    if chars.len() != 2 {
        return Err(CfrError::InvalidCardNotation(notation.to_string()));
    }
    let rank = Rank::from_char(chars[0])?;
    let suit = Suit::from_char(chars[1])?;
    Ok(Card::new(rank, suit))
}

/// Parse a run of two-character cards such as `"AsKd7c"`. Spaces and commas
/// are ignored; duplicate cards are rejected.
pub fn parse_board(notation: &str) -> CfrResult<Vec<Card>> {
    let cleaned: String = notation
        .chars()
        .filter(|c| !c.is_whitespace() && *c != ',')
        .collect();
    let chars: Vec<char> = cleaned.chars().collect();
    if chars.len() % 2 != 0 {
        return Err(CfrError::InvalidBoardNotation(notation.to_string()));
    }
    let mut cards: Vec<Card> = Vec::with_capacity(chars.len() / 2);
    for pair in chars.chunks(2) {
        let s: String = pair.iter().collect();
        let card = parse_card(&s)?;
        if cards.contains(&card) {
            return Err(CfrError::InvalidBoardNotation(notation.to_string()));
        }
        cards.push(card);
    }
    Ok(cards)
}

/// Parse exactly two hole cards (e.g. `"AhKh"`).
pub fn parse_hole(notation: &str) -> CfrResult<[Card; 2]> {
    let cards = parse_board(notation)?;
    match cards.as_slice() {
        [a, b] => Ok([*a, *b]),
        _ => Err(CfrError::InvalidCardNotation(notation.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_single_card() {
        let c = parse_card("Ah").unwrap();
        assert_eq!(c, Card::new(Rank::Ace, Suit::Hearts));
        assert_eq!(c.to_string(), "Ah");
    }

    #[test]
    fn lowercase_rank_accepted() {
        assert_eq!(parse_card("td").unwrap().rank, Rank::Ten);
    }

    #[test]
    fn invalid_rank_and_suit() {
        assert!(matches!(parse_card("Xh"), Err(CfrError::InvalidRank('X'))));
        assert!(matches!(parse_card("Ax"), Err(CfrError::InvalidSuit('x'))));
    }

    #[test]
    fn board_with_separators() {
        let board = parse_board("As, Kd 7c").unwrap();
        assert_eq!(board.len(), 3);
        assert_eq!(board[2], Card::new(Rank::Seven, Suit::Clubs));
    }

    #[test]
    fn board_rejects_duplicates_and_odd_length() {
        assert!(parse_board("AsAs").is_err());
        assert!(parse_board("AsK").is_err());
    }

    #[test]
    fn empty_board_is_preflop() {
        assert!(parse_board("").unwrap().is_empty());
    }

    #[test]
    fn hole_needs_two_cards() {
        assert!(parse_hole("AhKh").is_ok());
        assert!(parse_hole("Ah").is_err());
        assert!(parse_hole("AhKhQh").is_err());
    }
}
