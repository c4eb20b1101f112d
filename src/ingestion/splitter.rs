//! Separator-bounded text splitting

/// Splits text on a separator into chunks of bounded length
///
/// Pieces are packed greedily: a chunk grows until appending the next piece
/// (separator included) would push it past the maximum. A single piece
/// longer than the maximum becomes its own chunk rather than being cut.
/// Joining the chunks back with the separator reconstructs the input
/// exactly.
pub struct LineSplitter {
    separator: String,
    max_len: usize,
}

impl LineSplitter {
    /// Create a splitter
    pub fn new(separator: impl Into<String>, max_len: usize) -> Self {
        Self {
            separator: separator.into(),
            max_len,
        }
    }

    /// Split `text` into bounded chunks
    pub fn split(&self, text: &str) -> Vec<String> {
        if text.is_empty() {
            return Vec::new();
        }

        let mut chunks = Vec::new();
        let mut current = String::new();
        let mut started = false;

        for piece in text.split(&self.separator) {
            if !started {
                current.push_str(piece);
                started = true;
                continue;
            }

            if current.len() + self.separator.len() + piece.len() > self.max_len {
                chunks.push(std::mem::take(&mut current));
                current.push_str(piece);
            } else {
                current.push_str(&self.separator);
                current.push_str(piece);
            }
        }

        if started {
            chunks.push(current);
        }
        chunks
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_through_join() {
        let text = "Sub Category: snacks\nPrice: $9.99\nDiscount: 10%\nRating: 4.5\nTitle: Trail Mix\nFeature: resealable bag\nProduct Description: a hearty mix of nuts and dried fruit";
        let splitter = LineSplitter::new("\n", 60);

        let chunks = splitter.split(text);
        assert!(chunks.len() > 1);
        assert_eq!(chunks.join("\n"), text);
    }

    #[test]
    fn chunks_respect_the_maximum() {
        let text = (0..20).map(|i| format!("line {}", i)).collect::<Vec<_>>().join("\n");
        let splitter = LineSplitter::new("\n", 30);

        for chunk in splitter.split(&text) {
            assert!(chunk.len() <= 30, "chunk too long: {:?}", chunk);
        }
    }

    #[test]
    fn unsplittable_piece_stays_whole() {
        let long_line = "x".repeat(100);
        let text = format!("short\n{}\nshort", long_line);
        let splitter = LineSplitter::new("\n", 20);

        let chunks = splitter.split(&text);
        assert!(chunks.contains(&long_line));
        assert_eq!(chunks.join("\n"), text);
    }

    #[test]
    fn empty_input_yields_no_chunks() {
        let splitter = LineSplitter::new("\n", 10);
        assert!(splitter.split("").is_empty());
    }

    #[test]
    fn text_within_budget_is_one_chunk() {
        let splitter = LineSplitter::new("\n", 500);
        let chunks = splitter.split("a\nb\nc");
        assert_eq!(chunks, vec!["a\nb\nc"]);
    }
}
