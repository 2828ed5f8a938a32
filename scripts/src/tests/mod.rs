mod helpers;

pub(crate) const ROUNDS: u32 = 4;
