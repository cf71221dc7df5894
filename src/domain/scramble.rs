//! Random permutation of words and word lists.
//!
//! The same operation serves both uses in a session: shuffling the word
//! list at the start of a game and scrambling the letters of each word.
//! The output type mirrors the input (`&str` gives a `String`, `&[T]`
//! gives a `Vec<T>`).

use crate::domain::rng::GameRng;

pub trait Scramble {
    type Output;

    /// Return a uniformly random permutation of `self`'s elements.
    fn scramble(&self, rng: &mut GameRng) -> Self::Output;
}

impl Scramble for str {
    type Output = String;

    /// Permutes by `char`, so multi-byte letters are never split.
    fn scramble(&self, rng: &mut GameRng) -> String {
        let mut chars: Vec<char> = self.chars().collect();
        rng.shuffle(&mut chars);
        chars.into_iter().collect()
    }
}

impl<T: Clone> Scramble for [T] {
    type Output = Vec<T>;

    fn scramble(&self, rng: &mut GameRng) -> Vec<T> {
        let mut items = self.to_vec();
        rng.shuffle(&mut items);
        items
    }
}

/// Free-function form of [`Scramble::scramble`].
pub fn scramble<S: Scramble + ?Sized>(input: &S, rng: &mut GameRng) -> S::Output {
    input.scramble(rng)
}
