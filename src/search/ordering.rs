use crate::moves::MoveList;
use rand::Rng;
use rand::seq::SliceRandom;

/// Randomize the order candidates are searched in. Legality is unaffected;
/// only the choice between equally scored moves changes.
#[inline]
pub fn shuffle_moves<R: Rng + ?Sized>(moves: &mut MoveList, rng: &mut R) {
    moves.shuffle(rng);
}
