// Topic model — sufficient statistics, distributions, and the Gibbs sampler.

pub mod distribution;
pub mod sampler;
pub mod topic;
pub mod traits;
