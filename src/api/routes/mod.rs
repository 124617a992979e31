pub mod candidates;
pub mod leaderboard;
pub mod participants;
pub mod programmes;
pub mod results;
pub mod teams;
