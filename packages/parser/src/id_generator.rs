use crate::ast::ElementId;
use uuid::Uuid;

/// Fresh element identity. Time-ordered, so ids sort by creation.
pub fn new_element_id() -> ElementId {
    ElementId::new(Uuid::now_v7().to_string())
}

/// Sequential ID generator for rendered nodes within one render pass
#[derive(Clone)]
pub struct IDGenerator {
    seed: String,
    count: u32,
}

impl IDGenerator {
    pub fn new(seed: impl Into<String>) -> Self {
        Self {
            seed: seed.into(),
            count: 0,
        }
    }

    /// Generate next sequential ID
    pub fn new_id(&mut self) -> String {
        self.count += 1;
        format!("{}-{}", self.seed, self.count)
    }

    pub fn seed(&self) -> &str {
        &self.seed
    }

    pub fn count(&self) -> u32 {
        self.count
    }
}
