use std::time::{Duration, Instant};

const TYPE_DELAY: Duration = Duration::from_millis(100);
const DELETE_DELAY: Duration = Duration::from_millis(50);
const HOLD_FULL: Duration = Duration::from_millis(2000);
const HOLD_EMPTY: Duration = Duration::from_millis(500);

/// Cycles through a list of words: type, hold, delete, next.
pub struct Typewriter {
    words: &'static [&'static str],
    index: usize,
    visible: usize,
    deleting: bool,
    next_at: Instant,
}

impl Typewriter {
    pub fn new(words: &'static [&'static str], now: Instant) -> Self {
        Self {
            words,
            index: 0,
            visible: 0,
            deleting: false,
            next_at: now + TYPE_DELAY,
        }
    }

    fn word(&self) -> &'static str {
        self.words.get(self.index).copied().unwrap_or("")
    }

    pub fn text(&self) -> &'static str {
        let word = self.word();
        let end = word
            .char_indices()
            .nth(self.visible)
            .map_or(word.len(), |(i, _)| i);
        &word[..end]
    }

    pub fn advance(&mut self, now: Instant) {
        if self.words.is_empty() {
            return;
        }
        while self.next_at <= now {
            let len = self.word().chars().count();
            let delay = if self.deleting {
                if self.visible == 0 {
                    self.deleting = false;
                    self.index = (self.index + 1) % self.words.len();
                    TYPE_DELAY
                } else {
                    self.visible -= 1;
                    if self.visible == 0 {
                        HOLD_EMPTY
                    } else {
                        DELETE_DELAY
                    }
                }
            } else if self.visible < len {
                self.visible += 1;
                if self.visible == len {
                    HOLD_FULL
                } else {
                    TYPE_DELAY
                }
            } else {
                self.deleting = true;
                DELETE_DELAY
            };
            self.next_at += delay;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WORDS: &[&str] = &["ab", "xyz"];

    #[test]
    fn test_types_holds_and_deletes() {
        let t0 = Instant::now();
        let mut tw = Typewriter::new(WORDS, t0);
        assert_eq!(tw.text(), "");
        tw.advance(t0 + Duration::from_millis(100));
        assert_eq!(tw.text(), "a");
        tw.advance(t0 + Duration::from_millis(200));
        assert_eq!(tw.text(), "ab");
        // Held for two seconds.
        tw.advance(t0 + Duration::from_millis(2150));
        assert_eq!(tw.text(), "ab");
        tw.advance(t0 + Duration::from_millis(2250));
        assert_eq!(tw.text(), "a");
        tw.advance(t0 + Duration::from_millis(2300));
        assert_eq!(tw.text(), "");
    }

    #[test]
    fn test_moves_to_next_word() {
        let t0 = Instant::now();
        let mut tw = Typewriter::new(WORDS, t0);
        // a 100, ab 200, delete starts 2200, a 2250, "" 2300, next word 2800, x 2900.
        tw.advance(t0 + Duration::from_millis(2900));
        assert_eq!(tw.text(), "x");
    }

    #[test]
    fn test_wraps_around() {
        let t0 = Instant::now();
        let mut tw = Typewriter::new(WORDS, t0);
        tw.advance(t0 + Duration::from_secs(60));
        assert!(WORDS.iter().any(|w| w.starts_with(tw.text())));
    }
}
