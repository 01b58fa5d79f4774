use url::form_urlencoded;

pub const GENE_CHOICE: &str = "geneChoice";
pub const CUSTOM_SUB: &str = "customSub";
pub const CANCER_SELECT: &str = "cancerSelect";
pub const STAGE_SELECT: &str = "stageSelect";
pub const DATA_OPTION: &str = "dataOption_clinical";

/// Every key `QueryParameters` owns.
pub const KEYS: [&str; 5] = [GENE_CHOICE, CUSTOM_SUB, CANCER_SELECT, STAGE_SELECT, DATA_OPTION];

/// The five parameters a profile page is requested with.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParameters {
    pub gene_choice: String,
    pub custom_sub: String,
    pub cancer_select: String,
    pub stage_select: String,
    pub data_option: String,
}

impl QueryParameters {
    /// Read the parameters from a profile link, absolute or server-relative.
    /// Missing or blank keys become empty strings; values are not validated.
    pub fn from_url(link: &str) -> Self {
        let pairs: Vec<(String, String)> = form_urlencoded::parse(query_part(link).as_bytes())
            .filter(|(_, v)| !v.is_empty())
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();

        let first = |key: &str| -> String {
            pairs
                .iter()
                .find(|(k, _)| k == key)
                .map(|(_, v)| v.clone())
                .unwrap_or_default()
        };

        QueryParameters {
            gene_choice: first(GENE_CHOICE),
            custom_sub: first(CUSTOM_SUB),
            cancer_select: first(CANCER_SELECT),
            stage_select: first(STAGE_SELECT),
            data_option: first(DATA_OPTION),
        }
    }

    /// Key/value pairs in the order the profile endpoint expects them.
    pub fn pairs(&self) -> [(&'static str, &str); 5] {
        [
            (GENE_CHOICE, self.gene_choice.as_str()),
            (CUSTOM_SUB, self.custom_sub.as_str()),
            (CANCER_SELECT, self.cancer_select.as_str()),
            (STAGE_SELECT, self.stage_select.as_str()),
            (DATA_OPTION, self.data_option.as_str()),
        ]
    }
}

fn query_part(link: &str) -> &str {
    let without_fragment = link.split('#').next().unwrap_or_default();
    without_fragment
        .split_once('?')
        .map(|(_, q)| q)
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_five_keys() {
        let q = QueryParameters::from_url(
            "/profile?geneChoice=TP53&customSub=Basal&cancerSelect=HNSC&stageSelect=cstage&dataOption_clinical=expression",
        );
        assert_eq!(
            q,
            QueryParameters {
                gene_choice: "TP53".into(),
                custom_sub: "Basal".into(),
                cancer_select: "HNSC".into(),
                stage_select: "cstage".into(),
                data_option: "expression".into(),
            }
        );
    }

    #[test]
    fn missing_custom_sub() {
        let q = QueryParameters::from_url(
            "/profile?geneChoice=TP53&cancerSelect=HNSC&stageSelect=cstage&dataOption_clinical=expression",
        );
        assert_eq!(q.custom_sub, "");
        assert_eq!(q.gene_choice, "TP53");
    }

    #[test]
    fn absolute_url_and_first_value_wins() {
        let q = QueryParameters::from_url(
            "https://oncodb.org/cgi-bin/p.cgi?geneChoice=&geneChoice=EGFR&geneChoice=KRAS#top",
        );
        assert_eq!(q.gene_choice, "EGFR");
        assert_eq!(q.data_option, "");
    }

    #[test]
    fn percent_decoding() {
        let q = QueryParameters::from_url("/p?customSub=Basal%20like&cancerSelect=HN+SC");
        assert_eq!(q.custom_sub, "Basal like");
        assert_eq!(q.cancer_select, "HN SC");
    }

    #[test]
    fn no_query_string() {
        assert_eq!(QueryParameters::from_url("/profile"), QueryParameters::default());
    }

    #[test]
    fn pairs_order() {
        let q = QueryParameters::from_url("/p?customSub=LumA&geneChoice=MYC");
        let keys: Vec<_> = q.pairs().iter().map(|(k, _)| *k).collect();
        assert_eq!(keys, vec![GENE_CHOICE, CUSTOM_SUB, CANCER_SELECT, STAGE_SELECT, DATA_OPTION]);
        assert_eq!(q.pairs()[1].1, "LumA");
    }
}
