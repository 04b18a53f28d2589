pub mod judge;

use std::sync::Arc;

use anyhow::Result;

use crate::domain::models::BackendRef;

pub struct BackendManager {}

impl BackendManager {
    pub fn get() -> Result<BackendRef> {
        return Ok(Arc::<judge::Judge>::default());
    }
}
