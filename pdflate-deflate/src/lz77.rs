//! LZ77 string matching with lazy evaluation.
//!
//! The matcher indexes every position of the input by a 16-bit hash of the
//! three bytes starting there. `head` holds the most recent position for each
//! hash and `prev` links each position to the previous one with the same
//! hash, so walking `prev` visits candidates from nearest to farthest.
//!
//! Matching is lazy: after finding a match at position P the matcher also
//! searches at P + 1, and emits the match at P only if the one at P + 1 is not
//! longer. Otherwise the byte at P becomes a literal and the longer match is
//! carried forward.

use crate::tables::{HASH_TABLE_SIZE, HASH_XLATE, MAX_MATCH, MIN_MATCH, WINDOW_MASK, WINDOW_SIZE};

/// Stop following the chain at this length.
pub const NICE_LENGTH: usize = 128;

/// Above this length the chain is searched only a quarter as deep.
pub const GOOD_LENGTH: usize = 8;

/// Maximum number of chain entries probed per search.
pub const MAX_CHAIN: usize = 128;

/// A length-3 match further back than this costs more than three literals.
pub const TOO_FAR: usize = 4096;

/// Empty hash slot.
const NIL: usize = usize::MAX;

/// A token produced by LZ77 matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token {
    /// A literal byte.
    Literal(u8),
    /// A back-reference.
    Match {
        /// Distance back to the start of the match (1-32768).
        distance: u16,
        /// Length of the match (3-258).
        length: u16,
    },
}

impl Token {
    /// Number of input bytes the token stands for.
    #[inline]
    pub fn len(&self) -> usize {
        match self {
            Token::Literal(_) => 1,
            Token::Match { length, .. } => *length as usize,
        }
    }

    /// Always false; tokens cover at least one byte.
    #[inline]
    pub fn is_empty(&self) -> bool {
        false
    }
}

/// Iterator over the LZ77 tokens of one input buffer.
#[derive(Debug)]
pub struct Lz77Matcher<'a> {
    input: &'a [u8],
    /// Current position.
    pos: usize,
    /// Start of the best match found so far.
    match_start: usize,
    /// Length of the best match found so far, `MIN_MATCH - 1` for none.
    match_len: usize,
    /// The byte before `pos` has not been emitted yet.
    literal_pending: bool,
    /// Most recent position per hash.
    head: Vec<usize>,
    /// Previous position with the same hash, indexed by `pos & WINDOW_MASK`.
    prev: Vec<usize>,
}

impl<'a> Lz77Matcher<'a> {
    /// Create a matcher over `input`.
    pub fn new(input: &'a [u8]) -> Self {
        Self {
            input,
            pos: 0,
            match_start: 0,
            match_len: MIN_MATCH - 1,
            literal_pending: false,
            head: vec![NIL; HASH_TABLE_SIZE],
            prev: vec![NIL; WINDOW_SIZE],
        }
    }

    /// Bytes from the current position to the end of the input.
    #[inline]
    fn remaining(&self) -> usize {
        self.input.len() - self.pos
    }

    #[inline]
    fn hash(&self, pos: usize) -> usize {
        let word = u16::from_le_bytes([self.input[pos], self.input[pos + 1]]);
        (word ^ HASH_XLATE[self.input[pos + 2] as usize]) as usize
    }

    /// Index the current position and return the previous position with the
    /// same hash. Does nothing near the end of the input.
    fn insert_string(&mut self) -> usize {
        if self.remaining() < MIN_MATCH {
            return NIL;
        }

        let hash = self.hash(self.pos);
        let previous = self.head[hash];
        self.head[hash] = self.pos;
        self.prev[self.pos & WINDOW_MASK] = previous;
        previous
    }

    /// Search the chain for a match longer than the current one.
    ///
    /// Also indexes the current position.
    fn find_longest_match(&mut self) {
        let max_scan = self.pos + self.remaining().min(MAX_MATCH);
        let limit = self.pos.saturating_sub(WINDOW_SIZE);
        let chain = if self.match_len < GOOD_LENGTH {
            MAX_CHAIN
        } else {
            MAX_CHAIN / 4
        };

        let mut scan_end = self.pos + self.match_len;
        let mut scan_end_value = self.input[scan_end];
        let mut candidate = NIL;

        for _ in 0..chain {
            candidate = if candidate == NIL {
                self.insert_string()
            } else {
                self.prev[candidate & WINDOW_MASK]
            };

            if candidate == NIL || candidate < limit {
                break;
            }

            // cannot beat the current match unless this byte agrees
            if self.input[candidate + self.match_len] != scan_end_value {
                continue;
            }

            let len = self.input[self.pos..max_scan]
                .iter()
                .zip(&self.input[candidate..])
                .take_while(|(a, b)| a == b)
                .count();
            let scan = self.pos + len;

            if scan > scan_end {
                self.match_start = candidate;
                self.match_len = len;

                if len >= NICE_LENGTH || scan == max_scan {
                    break;
                }

                scan_end = scan;
                scan_end_value = self.input[scan_end];
            }
        }

        if self.match_len == MIN_MATCH && self.pos - self.match_start > TOO_FAR {
            self.match_len = MIN_MATCH - 1;
        }
    }

    /// Emit the match that starts one byte before the current position.
    fn take_previous_match(&mut self, start: usize, length: usize) -> Token {
        let distance = self.pos - 1 - start;

        // index every position the match covers
        for _ in 0..length - 2 {
            self.pos += 1;
            self.insert_string();
        }

        self.literal_pending = false;
        self.match_len = MIN_MATCH - 1;
        self.pos += 1;

        Token::Match {
            distance: distance as u16,
            length: length as u16,
        }
    }
}

/// Token stream that takes every match as soon as it is found, using the
/// same chain search as the lazy matcher.
#[cfg(test)]
pub(crate) fn greedy_tokens(input: &[u8]) -> Vec<Token> {
    let mut matcher = Lz77Matcher::new(input);
    let mut tokens = Vec::new();

    while matcher.pos < input.len() {
        if matcher.remaining() >= MIN_MATCH {
            matcher.match_len = MIN_MATCH - 1;
            matcher.find_longest_match();

            let length = matcher.match_len;
            if length >= MIN_MATCH {
                tokens.push(Token::Match {
                    distance: (matcher.pos - matcher.match_start) as u16,
                    length: length as u16,
                });
                for _ in 1..length {
                    matcher.pos += 1;
                    matcher.insert_string();
                }
                matcher.pos += 1;
                continue;
            }
        }

        tokens.push(Token::Literal(input[matcher.pos]));
        matcher.pos += 1;
    }

    tokens
}

impl Iterator for Lz77Matcher<'_> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        loop {
            if self.remaining() < MIN_MATCH {
                if self.literal_pending {
                    self.literal_pending = false;
                    return Some(Token::Literal(self.input[self.pos - 1]));
                }
                let byte = *self.input.get(self.pos)?;
                self.pos += 1;
                return Some(Token::Literal(byte));
            }

            let prev_start = self.match_start;
            let prev_len = self.match_len;

            if self.match_len < NICE_LENGTH && self.match_len < self.remaining() {
                self.find_longest_match();
            } else {
                self.insert_string();
            }

            if prev_len >= MIN_MATCH && prev_len >= self.match_len {
                return Some(self.take_previous_match(prev_start, prev_len));
            }

            // the match here (if any) is better; the byte before is a literal
            let pending = self.literal_pending.then(|| self.input[self.pos - 1]);
            self.literal_pending = true;
            self.pos += 1;

            if let Some(byte) = pending {
                return Some(Token::Literal(byte));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Rebuild the input from tokens.
    fn expand(tokens: &[Token]) -> Vec<u8> {
        let mut out = Vec::new();
        for token in tokens {
            match *token {
                Token::Literal(byte) => out.push(byte),
                Token::Match { distance, length } => {
                    let start = out.len() - distance as usize;
                    for i in 0..length as usize {
                        out.push(out[start + i]);
                    }
                }
            }
        }
        out
    }

    fn tokens(input: &[u8]) -> Vec<Token> {
        Lz77Matcher::new(input).collect()
    }

    fn check_valid(input: &[u8]) -> Vec<Token> {
        let tokens = tokens(input);
        let mut pos = 0;
        for token in &tokens {
            if let Token::Match { distance, length } = *token {
                assert!((MIN_MATCH..=MAX_MATCH).contains(&(length as usize)));
                assert!(distance >= 1 && distance as usize <= WINDOW_SIZE);
                assert!(distance as usize <= pos, "distance {} before start at {}", distance, pos);
            }
            pos += token.len();
        }
        assert_eq!(expand(&tokens), input);
        tokens
    }

    #[test]
    fn test_empty_and_tiny() {
        assert!(tokens(b"").is_empty());
        assert_eq!(tokens(b"a"), vec![Token::Literal(b'a')]);
        assert_eq!(tokens(b"ab"), vec![Token::Literal(b'a'), Token::Literal(b'b')]);
        assert_eq!(
            tokens(b"abc"),
            vec![Token::Literal(b'a'), Token::Literal(b'b'), Token::Literal(b'c')]
        );
    }

    #[test]
    fn test_run_uses_distance_one() {
        let input = vec![b'A'; 1000];
        let tokens = check_valid(&input);
        assert_eq!(tokens[0], Token::Literal(b'A'));
        assert_eq!(
            tokens[1],
            Token::Match {
                distance: 1,
                length: 258
            }
        );
        assert!(tokens.len() < 10);
    }

    #[test]
    fn test_lazy_match_prefers_longer() {
        let input = b"abcXbcdefghYabcdefgh";
        let tokens = check_valid(input);

        let mut expected: Vec<Token> = input[..12].iter().map(|&b| Token::Literal(b)).collect();
        expected.push(Token::Literal(b'a'));
        expected.push(Token::Match {
            distance: 9,
            length: 7,
        });
        assert_eq!(tokens, expected);
    }

    #[test]
    fn test_short_far_match_dropped() {
        let mut input = b"qzj".to_vec();
        input.extend((0..5000u32).map(|i| b'a' + (i % 7) as u8 + (i / 700) as u8 % 3 * 7));
        input.extend_from_slice(b"qzj");
        let tokens = check_valid(&input);

        // the trailing "qzj" only matches 5000 bytes back
        let tail = &tokens[tokens.len() - 3..];
        assert!(tail.iter().all(|t| matches!(t, Token::Literal(_))));
    }

    #[test]
    fn test_near_short_match_kept() {
        let tokens = check_valid(b"qzj0123456789qzj!!");
        assert_eq!(
            tokens[tokens.len() - 3],
            Token::Match {
                distance: 13,
                length: 3
            }
        );
    }

    #[test]
    fn test_matches_stay_inside_window() {
        // a pattern repeated at a period longer than the window
        let mut state = 0x1234_5678u32;
        let block: Vec<u8> = (0..40_000)
            .map(|_| {
                state = state.wrapping_mul(1_103_515_245).wrapping_add(12345);
                (state >> 16) as u8
            })
            .collect();
        let mut input = block.clone();
        input.extend_from_slice(&block);
        check_valid(&input);
    }

    #[test]
    fn test_text_roundtrip() {
        let text = b"It was the best of times, it was the worst of times, it was the age of \
                     wisdom, it was the age of foolishness, it was the epoch of belief, it was \
                     the epoch of incredulity, it was the season of Light, it was the season of \
                     Darkness";
        let tokens = check_valid(text);
        assert!(tokens.iter().any(|t| matches!(t, Token::Match { .. })));
        assert!(tokens.len() < text.len() * 3 / 4);
    }
}
