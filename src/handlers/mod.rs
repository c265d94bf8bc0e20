// Two handler tiers: public (login flow) and protected (everything behind
// the session gate).
pub mod protected;
pub mod public;
