//! Typing effect: a finite, lazily advanced sequence of growing prefixes.

/// Emits prefixes of `text` one character (Unicode scalar) at a time.
///
/// Starts at the empty prefix. Once the whole text has been emitted the emitter
/// is complete and stays frozen; it cannot be rewound. `T` is any owned or
/// borrowed string; the borrowed form is also an [`Iterator`] over prefixes.
#[derive(Clone, Debug)]
pub struct TypingEmitter<T = String> {
    text: T,
    // Byte offset of the end of the current prefix, always on a char boundary.
    end: usize,
}

impl<T: AsRef<str>> TypingEmitter<T> {
    pub fn new(text: T) -> Self {
        Self { text, end: 0 }
    }

    pub fn text(&self) -> &str {
        self.text.as_ref()
    }

    /// Prefix emitted so far.
    pub fn shown(&self) -> &str {
        &self.text.as_ref()[..self.end]
    }

    /// Characters emitted so far.
    pub fn shown_chars(&self) -> usize {
        self.shown().chars().count()
    }

    pub fn remaining_chars(&self) -> usize {
        self.text.as_ref()[self.end..].chars().count()
    }

    pub fn is_complete(&self) -> bool {
        self.end >= self.text.as_ref().len()
    }

    /// Reveal one more character. `None` once complete.
    pub fn advance(&mut self) -> Option<&str> {
        let next = self.text.as_ref()[self.end..].chars().next()?;
        self.end += next.len_utf8();
        Some(self.shown())
    }

    /// Text a reader sees: the full message once revealed, else the typed prefix.
    pub fn displayed(&self, revealed: bool) -> &str {
        if revealed { self.text() } else { self.shown() }
    }
}

impl<'a> Iterator for TypingEmitter<&'a str> {
    type Item = &'a str;

    fn next(&mut self) -> Option<&'a str> {
        let text: &'a str = self.text;
        let next = text[self.end..].chars().next()?;
        self.end += next.len_utf8();
        Some(&text[..self.end])
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = self.remaining_chars();
        (left, Some(left))
    }
}

impl ExactSizeIterator for TypingEmitter<&str> {}

impl std::iter::FusedIterator for TypingEmitter<&str> {}
