pub mod bot;
pub mod driver;
pub mod policy;

pub use bot::{BotContext, BotDifficulty, Decision, PlayPlanner, SwapPlanner, structural_cards};
pub use driver::{TurnReport, run_cpu_turn};
pub use policy::{HeuristicPolicy, Policy, PolicyContext};
