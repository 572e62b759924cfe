//! Identifier Resolution Module
//!
//! Maps a canonical park code to the facility provider's area id. The static
//! table is consulted first; otherwise the park's display name is searched
//! remotely and the best candidate chosen by a fixed tie-break chain.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

use crate::Result;
use crate::catalog::Catalog;
use crate::models::{LocationCode, RemoteAreaId};
use crate::providers::{AreaCandidate, RidbClient};

/// Outcome of resolving a park code
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Resolution {
    Found(RemoteAreaId),
    NotFound,
}

impl Resolution {
    #[must_use]
    pub fn found(self) -> Option<RemoteAreaId> {
        match self {
            Self::Found(id) => Some(id),
            Self::NotFound => None,
        }
    }
}

/// Which tie-break rule selected a candidate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchRule {
    ExactName,
    NationalParkName,
    ContainsName,
    FirstResult,
}

/// Service for resolving park codes into remote area ids
pub struct IdentifierResolver {
    catalog: Arc<Catalog>,
    ridb: Arc<RidbClient>,
}

impl IdentifierResolver {
    #[must_use]
    pub fn new(catalog: Arc<Catalog>, ridb: Arc<RidbClient>) -> Self {
        Self { catalog, ridb }
    }

    /// Resolve a park code. Transport failures are errors; an unknown code or
    /// an empty search is [`Resolution::NotFound`].
    #[instrument(skip(self), fields(code = %code))]
    pub async fn resolve(&self, code: &LocationCode) -> Result<Resolution> {
        if let Some(id) = self.catalog.area_id(code) {
            debug!("Static table hit: {} -> {}", code, id);
            return Ok(Resolution::Found(id.clone()));
        }

        let Some(display_name) = self.catalog.display_name(code) else {
            debug!("No display name configured for {}", code);
            return Ok(Resolution::NotFound);
        };

        let candidates = self.ridb.search_areas(display_name).await?;
        let Some((candidate, rule)) = pick_best_candidate(display_name, &candidates) else {
            info!("Area search for '{}' returned no candidates", display_name);
            return Ok(Resolution::NotFound);
        };

        if rule == MatchRule::FirstResult {
            warn!(
                "No name match for '{}', falling back to first result '{}'",
                display_name, candidate.name
            );
        } else {
            debug!(
                "Resolved {} to '{}' ({}) via {:?}",
                code, candidate.name, candidate.id, rule
            );
        }
        Ok(Resolution::Found(candidate.id.clone()))
    }
}

/// Apply the tie-break chain; the first rule with any match wins
///
/// 1. case-insensitive exact name
/// 2. name contains "`<display name>` national park"
/// 3. name contains the display name
/// 4. first candidate
#[must_use]
pub fn pick_best_candidate<'a>(
    display_name: &str,
    candidates: &'a [AreaCandidate],
) -> Option<(&'a AreaCandidate, MatchRule)> {
    let wanted = display_name.trim().to_lowercase();
    let national_park = format!("{wanted} national park");
    let lowered: Vec<String> = candidates.iter().map(|c| c.name.to_lowercase()).collect();

    let rules: [(MatchRule, &dyn Fn(&str) -> bool); 3] = [
        (MatchRule::ExactName, &|name: &str| name.trim() == wanted),
        (MatchRule::NationalParkName, &|name: &str| name.contains(&national_park)),
        (MatchRule::ContainsName, &|name: &str| name.contains(&wanted)),
    ];

    for (rule, matches) in rules {
        if let Some(index) = lowered.iter().position(|name| matches(name.as_str())) {
            return candidates.get(index).map(|c| (c, rule));
        }
    }

    candidates.first().map(|c| (c, MatchRule::FirstResult))
}
