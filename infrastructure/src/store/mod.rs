//! Proposal storage adapters

mod memory;

pub use memory::InMemoryProposalRepository;
