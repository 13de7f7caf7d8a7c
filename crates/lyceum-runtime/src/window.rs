//! Context window management.
//!
//! Picks the slice of the log sent to the model. History is only ever cut at
//! a loop boundary: the cursor jumps from one synthetic user turn to the next
//! until the estimated cost fits the adapter's budget.

use std::collections::HashMap;

use tracing::{debug, info};

use lyceum_protocols::{ModelAdapter, RuntimeError, ToolCatalogEntry, Turn};

/// Window cursor plus a per-position token cost cache.
///
/// Turns are immutable, so a cost computed once for a position stays valid for
/// the life of the window. Each render only estimates newly appended turns.
#[derive(Debug, Default)]
pub struct ContextWindow {
    loop_start: i64,
    costs: HashMap<i64, u64>,
}

impl ContextWindow {
    pub fn new() -> Self {
        Self::default()
    }

    /// First position of the oldest loop still eligible for rendering.
    pub fn loop_start(&self) -> i64 {
        self.loop_start
    }

    /// Turn slice to send, starting at a loop boundary and fitting the budget.
    pub fn render(
        &mut self,
        turns: &[Turn],
        system: &str,
        catalog: &[ToolCatalogEntry],
        adapter: &dyn ModelAdapter,
    ) -> Result<Vec<Turn>, RuntimeError> {
        if turns.is_empty() {
            return Ok(Vec::new());
        }

        let budget = adapter.max_tokens();
        let overhead = adapter.estimate_text(system) + catalog_cost(catalog, adapter);

        loop {
            let start = turns
                .iter()
                .position(|t| t.position >= self.loop_start)
                .unwrap_or(turns.len());
            let slice = &turns[start..];
            let estimated = overhead + self.slice_cost(slice, adapter);

            if estimated <= budget {
                debug!(
                    "Rendered {} turns from position {} (~{} / {} tokens)",
                    slice.len(),
                    self.loop_start,
                    estimated,
                    budget
                );
                return Ok(slice.to_vec());
            }

            match slice.iter().skip(1).find(|t| t.is_loop_boundary()) {
                Some(next) => {
                    info!(
                        "Context over budget (~{} / {} tokens), \
                         dropping loop at position {}, new start {}",
                        estimated, budget, self.loop_start, next.position
                    );
                    self.loop_start = next.position;
                }
                None => {
                    return Err(RuntimeError::ContextOverflow {
                        estimated,
                        budget,
                        loop_start: self.loop_start,
                    });
                }
            }
        }
    }

    fn slice_cost(&mut self, slice: &[Turn], adapter: &dyn ModelAdapter) -> u64 {
        let mut total = 0;
        for turn in slice {
            total += *self
                .costs
                .entry(turn.position)
                .or_insert_with(|| adapter.estimate_tokens(turn));
        }
        total
    }
}

fn catalog_cost(catalog: &[ToolCatalogEntry], adapter: &dyn ModelAdapter) -> u64 {
    catalog
        .iter()
        .map(|entry| {
            adapter.estimate_text(&entry.qualified_name)
                + adapter.estimate_text(&entry.description)
                + adapter.estimate_text(&entry.input_schema.to_string())
        })
        .sum()
}

#[cfg(test)]
#[path = "window_tests.rs"]
mod tests;
