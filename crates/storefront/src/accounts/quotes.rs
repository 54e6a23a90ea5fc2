//! Rotating quotes shown beside the login form.

use std::time::Duration;

/// How long each quote stays on screen.
pub const ROTATION_INTERVAL: Duration = Duration::from_secs(2);

/// The quotes, in display order.
pub const QUOTES: [&str; 20] = [
    "Dream big. Work hard.",
    "Too tired to be lazy.",
    "Push yourself, no one else will.",
    "Small steps every day.",
    "Success loves preparation.",
    "So many books, so little time.",
    "Reading is dreaming with open eyes.",
    "Books: my escape from reality.",
    "A room without books is empty.",
    "Life is short. Smile!",
    "Reading gives us someplace to go when we have to stay.",
    "Books are uniquely portable magic.",
    "Between the pages of a book is a lovely place to be.",
    "I see food, I eat it.",
    "Read. Learn. Grow.",
    "Hustle beats talent.",
    "Nap hard, dream big.",
    "Do it with passion.",
    "Hard work pays off.",
    "Stay focused, stay strong.",
];

/// Cycles through [`QUOTES`], wrapping after the last one.
#[derive(Debug, Clone, Default)]
pub struct QuoteRotator {
    index: usize,
}

impl QuoteRotator {
    /// Start at the first quote.
    #[must_use]
    pub const fn new() -> Self {
        Self { index: 0 }
    }

    /// Start at `index` (taken modulo the number of quotes).
    #[must_use]
    pub const fn starting_at(index: usize) -> Self {
        Self {
            index: index % QUOTES.len(),
        }
    }

    /// The quote currently shown.
    #[must_use]
    #[allow(clippy::indexing_slicing)] // index is kept below QUOTES.len()
    pub const fn current(&self) -> &'static str {
        QUOTES[self.index]
    }

    /// Move to the next quote and return it.
    pub const fn advance(&mut self) -> &'static str {
        self.index = (self.index + 1) % QUOTES.len();
        self.current()
    }
}

impl Iterator for QuoteRotator {
    type Item = &'static str;

    fn next(&mut self) -> Option<Self::Item> {
        Some(self.advance())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_at_first_quote() {
        assert_eq!(QuoteRotator::new().current(), "Dream big. Work hard.");
    }

    #[test]
    fn test_wraps_around() {
        let mut rotator = QuoteRotator::starting_at(QUOTES.len() - 1);
        assert_eq!(rotator.current(), "Stay focused, stay strong.");
        assert_eq!(rotator.advance(), "Dream big. Work hard.");
    }

    #[test]
    fn test_iterates_full_cycle() {
        let cycle: Vec<_> = QuoteRotator::new().take(QUOTES.len()).collect();
        assert_eq!(cycle.last().copied(), Some(QUOTES[0]));
        assert_eq!(cycle.first().copied(), Some(QUOTES[1]));
    }

    #[test]
    fn test_starting_at_wraps_index() {
        assert_eq!(QuoteRotator::starting_at(21).current(), QUOTES[1]);
    }
}
