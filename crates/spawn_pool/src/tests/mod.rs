//! Scenario tests for pool behaviour across whole spawn/despawn sequences
