//! Best-effort repair of legacy records with unsubstituted tokens.
//!
//! Older records were written with payload keys the renderer did not
//! recognize, leaving `{placeholder}` tokens in their stored title or
//! message. The sweep re-derives the variables from each record's
//! payload through the alias table, re-renders from the kind's
//! template and overwrites the text in place. Running the sweep twice
//! changes nothing the second time.

use serde_json::Map;
use serde::Serialize;

use crate::catalog;
use crate::error::{NotificationError, Result};
use crate::metrics;
use crate::record::NotificationRecord;
use crate::render;

use super::aliases;
use super::NotificationEngine;

/// Outcome counts of one repair sweep.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RepairSummary {
    /// Records that still carried at least one token.
    pub scanned: usize,
    /// Records whose title or message was rewritten.
    pub repaired: usize,
    /// Records left unchanged (no resolvable variables, or re-render
    /// produced the stored text).
    pub skipped: usize,
}

/// Re-render one field. `None` means keep the stored text: the render
/// changed nothing, or it would reintroduce a token the stored text
/// had already resolved (a payload missing variables that were
/// substituted at creation time must not undo that work).
fn repair_text(
    pattern: &str,
    stored: &str,
    variables: &Map<String, serde_json::Value>,
) -> Option<String> {
    let rendered = render::render(pattern, variables);
    if rendered == stored {
        return None;
    }
    let stored_tokens = render::placeholders(stored);
    if render::placeholders(&rendered)
        .iter()
        .any(|token| !stored_tokens.contains(token))
    {
        return None;
    }
    Some(rendered)
}

/// Compute the repaired (title, message) pair for a candidate record,
/// or `None` when the record should be left as it is.
fn rerender(record: &NotificationRecord) -> Option<(String, String)> {
    let template = catalog::lookup(record.kind);
    let payload = record.payload.as_object()?;

    let mut variables = Map::new();
    for name in render::placeholders(template.title)
        .into_iter()
        .chain(render::placeholders(template.message))
    {
        if variables.contains_key(name) {
            continue;
        }
        if let Some(value) = aliases::resolve(name, payload) {
            variables.insert(name.to_string(), value.clone());
        }
    }
    if variables.is_empty() {
        return None;
    }

    let title = repair_text(template.title, &record.title, &variables);
    let message = repair_text(template.message, &record.message, &variables);
    if title.is_none() && message.is_none() {
        return None;
    }
    Some((
        title.unwrap_or_else(|| record.title.clone()),
        message.unwrap_or_else(|| record.message.clone()),
    ))
}

impl NotificationEngine {
    /// Maintenance sweep over records whose stored text still carries
    /// `{placeholder}` tokens. Best-effort: records that cannot be
    /// improved are left untouched. Idempotent by construction — the
    /// store is only written when the re-render differs from the
    /// stored text.
    pub async fn repair_legacy_records(&self) -> Result<RepairSummary> {
        let candidates = self
            .records()
            .find_with_placeholders()
            .await
            .map_err(|e| NotificationError::store("repair_legacy_records", e))?;

        let mut summary = RepairSummary::default();
        for record in candidates {
            // The store prefilter may over-approximate (a lone brace);
            // re-check with the exact scanner.
            if !render::has_placeholders(&record.title)
                && !render::has_placeholders(&record.message)
            {
                continue;
            }
            summary.scanned += 1;

            match rerender(&record) {
                Some((title, message)) => {
                    self.records()
                        .update_content(record.id, &title, &message)
                        .await
                        .map_err(|e| NotificationError::store("repair_legacy_records", e))?;
                    metrics::NOTIFICATIONS_REPAIRED_TOTAL.inc();
                    tracing::debug!(
                        id = %record.id,
                        kind = %record.kind,
                        "repaired legacy notification text"
                    );
                    summary.repaired += 1;
                }
                None => summary.skipped += 1,
            }
        }

        tracing::info!(
            scanned = summary.scanned,
            repaired = summary.repaired,
            skipped = summary.skipped,
            "legacy notification repair sweep complete"
        );
        Ok(summary)
    }
}
