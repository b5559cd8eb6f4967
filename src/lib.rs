pub mod aks;
pub mod arith;
pub mod config;
pub mod order;
pub mod parse;
pub mod perfect_power;
pub mod poly;
pub mod progress;
pub mod totient;

pub use aks::{test_primality, Aks, AksReport, Step, Verdict};
pub use config::AksConfig;
pub use order::{find_r, multiplicative_order};
pub use perfect_power::is_perfect_power;
pub use poly::{check_poly_congruence, Poly, PolyRing};
pub use totient::totient;

