use std::cell::Cell;

pub type Token = u64;

/// Monotonic counter used to recognise stale asynchronous results.
///
/// Each operation takes a token when it is issued and checks, when it
/// completes, whether its token is still the latest one.
///
/// ```rust
/// use waymark::route::Generation;
///
/// let generation = Generation::default();
/// let first = generation.issue();
/// let second = generation.issue();
///
/// assert!(!generation.is_current(first));
/// assert!(generation.is_current(second));
/// ```
#[derive(Debug, Default)]
pub struct Generation {
    latest: Cell<Token>,
}

impl Generation {
    pub fn issue(&self) -> Token {
        let next = self.latest.get() + 1;
        self.latest.set(next);
        next
    }

    pub fn current(&self) -> Token {
        self.latest.get()
    }

    #[inline]
    pub fn is_current(&self, token: Token) -> bool {
        self.latest.get() == token
    }
}
