use crate::error::RunError;
use crate::names::NameTables;
use crate::notifier::{Delivery, Notify};
use crate::source::SurveySource;
use crate::state;
use crate::surveys::{FederalSurveys, Survey, federal_surveys};
use chrono::NaiveDateTime;
use std::collections::BTreeSet;
use std::path::Path;
use tracing::{error, info, warn};

#[derive(Debug)]
pub struct RunReport {
    pub known: usize,
    pub current: usize,
    pub new_ids: BTreeSet<String>,
    /// `None` when there was nothing new to notify about.
    pub delivery: Option<Delivery>,
}

/// One check: load state, fetch, filter, diff, notify if anything is new,
/// persist.
///
/// A failed fetch returns before the state file is touched. Once data has
/// been fetched the full current id set is persisted, whatever the
/// notification outcome.
pub async fn run<S, N>(
    source: &S,
    notifier: &N,
    names: &NameTables,
    state_path: &Path,
    now: NaiveDateTime,
) -> Result<RunReport, RunError>
where
    S: SurveySource,
    N: Notify,
{
    let mut state = state::load(state_path)?;
    let known = std::mem::take(&mut state.last_survey_ids);
    info!(known = known.len(), "loaded known surveys");

    let data = source.fetch().await.inspect_err(|e| {
        error!(error = ?e, "no polling data received, aborting");
    })?;

    let FederalSurveys {
        ids: current,
        surveys,
    } = federal_surveys(&data);
    info!(count = current.len(), "current federal election surveys");

    let new_ids: BTreeSet<String> = current.difference(&known).cloned().collect();

    let delivery = if new_ids.is_empty() {
        info!("no new surveys");
        None
    } else {
        let new_surveys: Vec<Survey> = surveys
            .into_iter()
            .filter(|s| new_ids.contains(&s.id))
            .collect();
        info!(count = new_ids.len(), "found new surveys");
        for survey in &new_surveys {
            info!(
                institute = names.institute(survey.institute_id).unwrap_or("unknown"),
                date = %survey.date,
                "new survey"
            );
        }
        if new_surveys.is_empty() {
            warn!(ids = ?new_ids, "no new survey could be rendered, skipping notification");
            None
        } else {
            Some(notifier.notify(&new_surveys).await)
        }
    };

    let report = RunReport {
        known: known.len(),
        current: current.len(),
        new_ids,
        delivery,
    };

    state.last_survey_ids = current;
    state.last_check = Some(now);
    state::save(state_path, &state)?;
    info!(path = %state_path.display(), "state saved");

    Ok(report)
}
