use std::collections::HashMap;

use crate::config::DuplicateIdPolicy;
use crate::error::{ConvertError, ConvertResult};

/// Identifier for the field at `index`, taken from its resource-id when usable.
pub fn derive_id(resource_id: Option<&str>, index: usize) -> String {
    resource_id
        .map(sanitize_resource_id)
        .filter(|id| !id.is_empty())
        .unwrap_or_else(|| format!("field_{index}"))
}

/// `com.app:id/1st-name` -> `id_1st_name`
fn sanitize_resource_id(resource_id: &str) -> String {
    let name = resource_id.rsplit('/').next().unwrap_or(resource_id);
    let mut id: String = name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
        .collect();
    if id.starts_with(|c: char| c.is_ascii_digit()) {
        id.insert_str(0, "id_");
    }
    id
}

/// Tracks identifiers handed out during one assembly pass.
pub struct IdRegistry {
    policy: DuplicateIdPolicy,
    taken: HashMap<String, usize>,
    renamed: usize,
}

impl IdRegistry {
    pub fn new(policy: DuplicateIdPolicy) -> Self {
        Self {
            policy,
            taken: HashMap::new(),
            renamed: 0,
        }
    }

    /// Claim `id` for the field at `index`, applying the duplicate policy.
    pub fn claim(&mut self, id: String, index: usize) -> ConvertResult<String> {
        let Some(&first) = self.taken.get(&id) else {
            self.taken.insert(id.clone(), index);
            return Ok(id);
        };

        match self.policy {
            DuplicateIdPolicy::Keep => Ok(id),
            DuplicateIdPolicy::Error => Err(ConvertError::DuplicateId {
                id,
                first,
                second: index,
            }),
            DuplicateIdPolicy::Suffix => {
                let unique = (2usize..)
                    .map(|n| format!("{id}_{n}"))
                    .find(|candidate| !self.taken.contains_key(candidate))
                    .unwrap_or_else(|| format!("{id}_{index}"));
                tracing::debug!(original = %id, renamed = %unique, "Renamed duplicate identifier");
                self.taken.insert(unique.clone(), index);
                self.renamed += 1;
                Ok(unique)
            }
        }
    }

    pub fn renamed(&self) -> usize {
        self.renamed
    }
}
