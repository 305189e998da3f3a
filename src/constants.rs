/// Rating given to placeholder teams. Lower than any real team's rating.
pub const TBD_ELO: f64 = 1000.0;

/// Share of the weakest real rating given to placeholders when the
/// configured placeholder rating is not below it
pub const PLACEHOLDER_RATING_SHARE: f64 = 0.4;

/// Display name used for placeholder teams
pub const TBD_NAME: &str = "TBD";

/// Number of rounds from the First Round to the Championship
pub const NUM_ROUNDS: u8 = 6;

/// Display names for rounds 1..=6
pub const ROUND_NAMES: [&str; 6] = [
    "First Round",
    "Second Round",
    "Sweet 16",
    "Elite Eight",
    "Final Four",
    "Championship",
];

/// Matchups a complete 64-team field produces in rounds 1..=6
pub const EXPECTED_MATCHUPS: [usize; 6] = [32, 16, 8, 4, 2, 1];

/// First-round seed pairings, in bracket order
pub const FIRST_ROUND_PAIRINGS: [(u8, u8); 8] =
    [(1, 16), (8, 9), (5, 12), (4, 13), (6, 11), (3, 14), (7, 10), (2, 15)];

/// Order regional champions are placed in for the Final Four.
/// Semifinal 1 is `[0]` vs `[1]`, semifinal 2 is `[2]` vs `[3]`.
pub const CANONICAL_REGIONS: [&str; 4] = ["East", "West", "South", "Midwest"];

/// Region label of round 5 games
pub const FINAL_FOUR: &str = "Final Four";

/// Region label of the round 6 game
pub const CHAMPIONSHIP: &str = "Championship";

/// Base randomness magnitude for rounds 2..=6
pub const LATER_ROUND_BASE_FACTOR: f64 = 0.20;

/// Randomness magnitude for first-round seed pairs missing from the table
pub const DEFAULT_FIRST_ROUND_FACTOR: f64 = 0.20;

/// Extra multiplier a 1 seed receives in the championship game
pub const CHAMPIONSHIP_BONUS: f64 = 1.05;

/// Display name of a round, or `None` outside 1..=6
pub fn round_name(round: u8) -> Option<&'static str> {
    match round {
        1..=NUM_ROUNDS => Some(ROUND_NAMES[usize::from(round) - 1]),
        _ => None,
    }
}

/// Matchups expected in `round` for a complete field
pub fn expected_matchups(round: u8) -> Option<usize> {
    match round {
        1..=NUM_ROUNDS => Some(EXPECTED_MATCHUPS[usize::from(round) - 1]),
        _ => None,
    }
}
