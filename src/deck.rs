use crate::cards::{Card, Rank, Suit};
use rand::seq::SliceRandom;
use rand::Rng;

/// A physical deck made of one or more standard 52-card packs.
///
/// Cards are dealt from the top (the end of the vector). [`Deck::reshuffle`]
/// gathers every dealt card back before shuffling.
#[derive(Debug, Clone)]
pub struct Deck {
    packs: u32,
    cards: Vec<Card>,
}

impl Deck {
    pub const PACK_SIZE: usize = 52;

    /// ```
    /// use deck_draw::deck::Deck;
    ///
    /// let deck = Deck::standard();
    /// assert_eq!(deck.len(), 52);
    /// ```
    pub fn standard() -> Self {
        Self::with_packs(1)
    }

    /// `packs` standard packs in suit-then-rank order. Zero packs is treated as one.
    pub fn with_packs(packs: u32) -> Self {
        let packs = packs.max(1);
        Self { packs, cards: Self::fresh(packs) }
    }

    fn fresh(packs: u32) -> Vec<Card> {
        let mut cards = Vec::with_capacity(Self::PACK_SIZE * packs as usize);
        for _ in 0..packs {
            for s in Suit::ALL {
                for r in Rank::ALL {
                    cards.push(Card::new(r, s));
                }
            }
        }
        cards
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Number of cards in the deck when nothing has been dealt.
    pub fn full_size(&self) -> usize {
        Self::PACK_SIZE * self.packs as usize
    }

    pub fn shuffle_with<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.cards.shuffle(rng);
    }

    /// Return all dealt cards to the deck and shuffle.
    pub fn reshuffle<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.cards = Self::fresh(self.packs);
        self.cards.shuffle(rng);
    }

    pub fn draw(&mut self) -> Option<Card> {
        self.cards.pop()
    }

    /// Draw up to `n` cards; fewer come back when the deck runs out.
    pub fn draw_n(&mut self, n: usize) -> Vec<Card> {
        (0..n).map_while(|_| self.draw()).collect()
    }
}
