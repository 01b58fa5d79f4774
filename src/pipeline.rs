use std::path::Path;

use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;
use url::Url;

use crate::client::{resolve, Fetch, FetchError};
use crate::export::{self, ExportError};
use crate::parser::links::extract_profile_links;
use crate::parser::query::{QueryParameters, KEYS};
use crate::parser::table::{extract_expression_table, ExpressionRecord};
use crate::report::RunReport;
use crate::settings::Settings;

/// Form fields posted to the clinical search endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    fields: Vec<(String, String)>,
}

impl SearchRequest {
    pub fn from_settings(settings: &Settings) -> Self {
        let fields = [
            ("dataOption_clinical", &settings.data_option),
            ("cancerSelect", &settings.cancer_select),
            ("stageSelect", &settings.stage_select),
            ("sigFilter", &settings.sig_filter),
            ("by_option", &settings.by_option),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.clone()))
        .collect();
        SearchRequest { fields }
    }

    pub fn fields(&self) -> &[(String, String)] {
        &self.fields
    }
}

/// Records collected by a run plus what went wrong along the way.
pub struct Harvest {
    pub records: Vec<ExpressionRecord>,
    pub report: RunReport,
}

pub struct Pipeline<F> {
    fetcher: F,
    settings: Settings,
}

impl<F: Fetch> Pipeline<F> {
    pub fn new(fetcher: F, settings: Settings) -> Self {
        Pipeline { fetcher, settings }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Post the search form and return at most `max_profiles` profile links.
    /// A failed search is recorded in `report` and yields no links.
    pub async fn discover(&self, report: &mut RunReport) -> Vec<String> {
        let search_url = match Url::parse(&self.settings.search_url()) {
            Ok(url) => url,
            Err(e) => {
                report.warn(&self.settings.search_url(), e.to_string());
                return Vec::new();
            }
        };
        let request = SearchRequest::from_settings(&self.settings);

        info!("Searching {} for {}", search_url, self.settings.cancer_select);
        let html = match self.fetcher.post_form(&search_url, request.fields()).await {
            Ok(html) => html,
            Err(e) => {
                report.warn(search_url.as_str(), format!("search failed: {}", e));
                return Vec::new();
            }
        };
        report.search_ok = true;

        let mut links = extract_profile_links(&html, &self.settings.profile_marker());
        report.links_discovered = links.len();
        info!("Found {} profile links", links.len());

        links.truncate(self.settings.max_profiles);
        links
    }

    /// Fetch one profile page and extract its expression rows.
    pub async fn harvest_profile(&self, link: &str) -> Result<Vec<ExpressionRecord>, FetchError> {
        self.fetch_profile(link, &QueryParameters::from_url(link)).await
    }

    async fn fetch_profile(
        &self,
        link: &str,
        params: &QueryParameters,
    ) -> Result<Vec<ExpressionRecord>, FetchError> {
        let url = profile_url(&self.settings.base_url, link, params)?;
        let html = self.fetcher.get(&url).await?;
        Ok(extract_expression_table(&html, &params.custom_sub))
    }

    /// Search, then harvest every retained profile in order. Profile failures
    /// are recorded as warnings; the run always completes.
    pub async fn run(&self) -> Harvest {
        let mut report = RunReport::new(&self.settings.search_url());
        let links = self.discover(&mut report).await;
        let mut records = Vec::new();

        let pb = ProgressBar::new(links.len() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("[{elapsed_precise}] {bar:40} {pos}/{len} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("=> "),
        );

        for link in &links {
            let params = QueryParameters::from_url(link);
            pb.set_message(params.gene_choice.clone());
            match self.fetch_profile(link, &params).await {
                Ok(rows) => {
                    report.links_processed += 1;
                    records.extend(rows);
                }
                Err(e) => report.warn(link, e.to_string()),
            }
            pb.inc(1);
        }
        pb.finish_and_clear();

        report.records = records.len();
        report.finish();
        info!(
            "Collected {} records from {} of {} profiles",
            records.len(),
            report.links_processed,
            links.len()
        );

        Harvest { records, report }
    }

    /// Run, then write whatever was collected to `output`. A failed search
    /// still produces a header-only file.
    pub async fn run_and_export(&self, output: &Path) -> Result<Harvest, ExportError> {
        let harvest = self.run().await;
        export::write_records(&harvest.records, output)?;
        Ok(harvest)
    }
}

/// Profile URL carrying the link's own query keys followed by the five
/// normalized parameters. Keys owned by `QueryParameters` appear once.
pub fn profile_url(base: &str, link: &str, params: &QueryParameters) -> Result<Url, FetchError> {
    let mut url = resolve(base, link)?;
    let others: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(k, _)| !KEYS.contains(&&**k))
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();
    url.set_query(None);
    url.query_pairs_mut()
        .extend_pairs(others)
        .extend_pairs(params.pairs());
    Ok(url)
}
