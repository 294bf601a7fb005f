/// Forward-only cursor over a single line, used by the task parser.
#[derive(Debug, Clone)]
pub struct Cursor<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> Cursor<'a> {
    pub fn new(src: &'a str) -> Self {
        Cursor { src, pos: 0 }
    }

    /// Current byte offset
    pub fn pos(&self) -> usize {
        self.pos
    }

    /// Rewind (or advance) to a byte offset previously returned by `pos`
    pub fn reset(&mut self, pos: usize) {
        self.pos = pos.min(self.src.len());
    }

    /// Unconsumed remainder of the line
    pub fn rest(&self) -> &'a str {
        &self.src[self.pos..]
    }

    pub fn is_empty(&self) -> bool {
        self.pos >= self.src.len()
    }

    /// Consume `prefix` if the remainder starts with it
    pub fn eat(&mut self, prefix: &str) -> bool {
        if self.rest().starts_with(prefix) {
            self.pos += prefix.len();
            true
        } else {
            false
        }
    }

    /// Consume one or more whitespace characters followed by `c`.
    /// Nothing is consumed on failure.
    pub fn eat_spaced(&mut self, c: char) -> bool {
        let start = self.pos;
        let spaces = self.take_while(char::is_whitespace);
        if !spaces.is_empty() && self.eat_char(c) {
            true
        } else {
            self.pos = start;
            false
        }
    }

    pub fn eat_char(&mut self, c: char) -> bool {
        if self.rest().starts_with(c) {
            self.pos += c.len_utf8();
            true
        } else {
            false
        }
    }

    /// Consume and return the next character
    pub fn next_char(&mut self) -> Option<char> {
        let c = self.rest().chars().next()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    /// Consume the longest prefix whose characters all satisfy `pred`
    pub fn take_while(&mut self, pred: impl Fn(char) -> bool) -> &'a str {
        let rest = self.rest();
        let len = rest.find(|c: char| !pred(c)).unwrap_or(rest.len());
        self.pos += len;
        &rest[..len]
    }

    /// Run `f`, rewinding to the starting position if it returns `None`
    pub fn attempt<T>(&mut self, f: impl FnOnce(&mut Self) -> Option<T>) -> Option<T> {
        let start = self.pos;
        let result = f(self);
        if result.is_none() {
            self.pos = start;
        }
        result
    }

    /// 1-based character column of the cursor, for error messages
    pub fn column(&self) -> usize {
        self.src[..self.pos].chars().count() + 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_eat_and_rest() {
        let mut cur = Cursor::new("(A) Buy milk");
        assert!(!cur.eat("(B)"));
        assert!(cur.eat("(A) "));
        assert_eq!(cur.rest(), "Buy milk");
        assert_eq!(cur.column(), 5);
    }

    #[test]
    fn test_take_while_stops_at_predicate() {
        let mut cur = Cursor::new("Buy milk :HOME");
        assert_eq!(cur.take_while(|c| c != ':'), "Buy milk ");
        assert_eq!(cur.rest(), ":HOME");
        assert_eq!(cur.take_while(|c| c != 'x'), ":HOME");
        assert!(cur.is_empty());
    }

    #[test]
    fn test_attempt_rewinds_on_failure() {
        let mut cur = Cursor::new("(a) task");
        let p = cur.attempt(|c| {
            c.eat_char('(');
            c.next_char().filter(char::is_ascii_uppercase)
        });
        assert_eq!(p, None);
        assert_eq!(cur.pos(), 0);
    }

    #[test]
    fn test_eat_spaced_requires_whitespace() {
        let mut cur = Cursor::new("x  :TAG");
        cur.eat_char('x');
        assert!(cur.eat_spaced(':'));
        assert_eq!(cur.rest(), "TAG");

        let mut cur = Cursor::new(":TAG");
        assert!(!cur.eat_spaced(':'));
        assert_eq!(cur.pos(), 0);

        let mut cur = Cursor::new("  +p");
        assert!(!cur.eat_spaced(':'));
        assert_eq!(cur.pos(), 0);
    }

    #[test]
    fn test_multibyte_column() {
        let mut cur = Cursor::new("été :x");
        cur.take_while(|c| c != ':');
        assert_eq!(cur.column(), 5);
    }
}
