use crate::names::NameTables;
use crate::surveys::Survey;
use shared::EmailConfig;

const BLOCK_SEPARATOR: &str = "---";

/// Renders surveys into the Markdown text of the notification email.
#[derive(Debug, Clone)]
pub struct Formatter {
    names: NameTables,
    archive_url: String,
    max_surveys: usize,
}

fn plural_n(count: usize) -> &'static str {
    if count > 1 { "n" } else { "" }
}

impl Formatter {
    pub fn new(names: NameTables, config: &EmailConfig) -> Self {
        Self {
            names,
            archive_url: config.archive_url.clone(),
            max_surveys: config.max_surveys,
        }
    }

    /// Header line with institute and date, then one bullet per party,
    /// highest share first.
    pub fn survey_block(&self, survey: &Survey) -> String {
        let institute = self.names.institute_label(survey.institute_id);

        let mut results: Vec<(&String, &f64)> = survey.results.iter().collect();
        results.sort_by(|a, b| b.1.total_cmp(a.1).then_with(|| a.0.cmp(b.0)));

        let lines = results
            .into_iter()
            .map(|(party, value)| format!("  • {}: {value}%", self.names.party_label(party)))
            .collect::<Vec<_>>()
            .join("\n");

        format!("**{institute}** ({})\n\n{lines}", survey.date)
    }

    pub fn subject(&self, count: usize) -> String {
        format!("📊 {count} neue Wahlumfrage{}", plural_n(count))
    }

    /// Only the first `max_surveys` surveys are rendered; the count sentence
    /// always reports all of them.
    pub fn body(&self, surveys: &[Survey]) -> String {
        let count = surveys.len();
        let mut parts = vec![
            "# Neue Bundestagswahl-Umfragen\n".to_string(),
            format!("Es gibt {count} neue Umfrage{}:\n", plural_n(count)),
        ];

        for survey in surveys.iter().take(self.max_surveys) {
            parts.push(self.survey_block(survey));
            parts.push(format!("\n{BLOCK_SEPARATOR}\n"));
        }

        parts.push(format!(
            "\n[Alle Umfragen im Poll Watcher ansehen]({})\n",
            self.archive_url
        ));
        parts.push("\n*Diese E-Mail wurde automatisch generiert.*".to_string());

        parts.join("\n")
    }

    /// Plain listing used when no email can be drafted: every survey, each
    /// followed by a separator line.
    pub fn console_report(&self, surveys: &[Survey]) -> String {
        surveys
            .iter()
            .map(|s| format!("{}\n{BLOCK_SEPARATOR}\n", self.survey_block(s)))
            .collect()
    }
}
