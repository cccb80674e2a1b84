//! Dossier detail page.

use serde::Serialize;

use super::{text, untitled_file, Locale};
use crate::models::{Dossier, DossierFile, TypeCode};

/// Publisher shown when a dossier does not name one.
pub const DEFAULT_PUBLISHER: &str = "Gemeente Nijmegen";

/// Role of a file within its dossier, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FileRole {
    #[serde(rename = "verzoek")]
    Request,
    #[serde(rename = "besluit")]
    Decision,
    #[serde(rename = "bijlage")]
    Attachment,
    #[serde(rename = "overige")]
    Other,
}

impl FileRole {
    pub const ALL: [FileRole; 4] = [
        FileRole::Request,
        FileRole::Decision,
        FileRole::Attachment,
        FileRole::Other,
    ];

    pub fn from_wire(role: &str) -> Self {
        match role {
            "verzoek" => FileRole::Request,
            "besluit" => FileRole::Decision,
            "bijlage" => FileRole::Attachment,
            _ => FileRole::Other,
        }
    }

    pub fn label(&self, locale: Locale) -> &'static str {
        match (self, locale) {
            (FileRole::Request, Locale::Nl) => "Verzoek",
            (FileRole::Request, Locale::En) => "Request",
            (FileRole::Decision, Locale::Nl) => "Besluit",
            (FileRole::Decision, Locale::En) => "Decision",
            (FileRole::Attachment, Locale::Nl) => "Bijlage",
            (FileRole::Attachment, Locale::En) => "Attachment",
            (FileRole::Other, Locale::Nl) => "Overige",
            (FileRole::Other, Locale::En) => "Other",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileEntry {
    pub id: String,
    pub name: String,
    /// Format without the `application/` prefix.
    pub format: String,
    pub pages: String,
    pub fair_score: String,
    pub download_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileGroup {
    pub role: FileRole,
    pub label: String,
    /// Request or decision text accompanying the group.
    pub text: Option<String>,
    pub files: Vec<FileEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DossierLinks {
    pub view: String,
    pub download: String,
}

/// Everything shown on a dossier detail page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DossierDetail {
    pub id: String,
    pub page_title: String,
    pub title: String,
    pub description: String,
    pub type_code: TypeCode,
    pub type_name: &'static str,
    pub topic: String,
    pub publisher: String,
    pub valuation: String,
    pub request_date: String,
    pub decision_date: String,
    pub published_date: String,
    pub retrieved_date: String,
    pub year: String,
    pub document_count: String,
    pub page_count: String,
    pub fair_score: String,
    pub links: DossierLinks,
    pub groups: Vec<FileGroup>,
}

/// Request dossiers name files after the uploaded file, others use the document title.
fn file_name(dossier: &Dossier, file: &DossierFile, locale: Locale) -> String {
    let (preferred, fallback) = if dossier.type_code.as_str() == TypeCode::REQUEST_DOSSIER {
        (&file.file_name, &file.title)
    } else {
        (&file.title, &file.file_name)
    };
    [preferred, fallback]
        .into_iter()
        .find(|name| !name.trim().is_empty())
        .cloned()
        .unwrap_or_else(|| untitled_file(locale).to_string())
}

fn pid_url(base_url: &str, id: &str) -> String {
    let encoded = urlencoding::encode(id);
    if base_url.contains('?') {
        format!("{}&pid={}", base_url, encoded)
    } else {
        format!("{}?pid={}", base_url, encoded)
    }
}

fn count_label(value: Option<u32>, locale: Locale) -> String {
    value
        .map(|n| n.to_string())
        .unwrap_or_else(|| text::unknown_label(locale).to_string())
}

/// Build the detail view of a dossier. `base_url` is the Woo resolver root.
pub fn build_detail(dossier: &Dossier, base_url: &str, locale: Locale) -> DossierDetail {
    let base = base_url.trim_end_matches('/');
    let view = pid_url(&format!("{}/", base), &dossier.id);

    let groups = FileRole::ALL
        .into_iter()
        .filter_map(|role| {
            let files: Vec<FileEntry> = dossier
                .files
                .iter()
                .filter(|f| FileRole::from_wire(&f.role) == role)
                .map(|f| FileEntry {
                    id: f.id.clone(),
                    name: file_name(dossier, f, locale),
                    format: f.format.trim_start_matches("application/").to_string(),
                    pages: text::pages_label(f.page_count, locale),
                    fair_score: text::fair_score_label(f.fair_score),
                    download_url: format!("{}/{}", base, f.id),
                })
                .collect();
            if files.is_empty() {
                return None;
            }
            let text = match role {
                FileRole::Request => dossier.request_text.as_deref(),
                FileRole::Decision => dossier.decision_text.as_deref(),
                _ => None,
            }
            .map(text::capitalize_first);
            Some(FileGroup {
                role,
                label: format!("{} ({})", role.label(locale), files.len()),
                text,
                files,
            })
        })
        .collect();

    DossierDetail {
        id: dossier.id.clone(),
        page_title: format!(
            "Dossier: {}",
            text::truncate(&dossier.title, text::PAGE_TITLE_LIMIT)
        ),
        title: text::capitalize_first(&dossier.title),
        description: text::capitalize_first(&dossier.description),
        type_code: dossier.type_code.clone(),
        type_name: text::type_name(&dossier.type_code, locale),
        topic: text::or_unknown(dossier.topic.as_deref(), locale),
        publisher: dossier
            .publisher_name
            .clone()
            .unwrap_or_else(|| DEFAULT_PUBLISHER.to_string()),
        valuation: text::or_unknown(dossier.valuation.as_deref(), locale),
        request_date: text::or_unknown(dossier.request_date.as_deref(), locale),
        decision_date: text::or_unknown(dossier.decision_date.as_deref(), locale),
        published_date: text::or_unknown(dossier.published_date.as_deref(), locale),
        retrieved_date: text::or_unknown(dossier.retrieved_date.as_deref(), locale),
        year: count_label(dossier.year.and_then(|y| u32::try_from(y).ok()), locale),
        document_count: count_label(dossier.document_count, locale),
        page_count: count_label(dossier.page_count, locale),
        fair_score: text::fair_score_label(dossier.fair_score),
        links: DossierLinks {
            download: format!("{}&zip=true", view),
            view,
        },
        groups,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::FairScore;

    fn file(id: &str, role: &str, title: &str, file_name: &str, pages: u32) -> DossierFile {
        DossierFile {
            id: id.to_string(),
            title: title.to_string(),
            file_name: file_name.to_string(),
            format: "application/pdf".to_string(),
            page_count: pages,
            role: role.to_string(),
            fair_score: FairScore::Score(0.5),
            dossier_id: "nl.gm0268.2i.2022.7".to_string(),
        }
    }

    fn request_dossier() -> Dossier {
        Dossier {
            id: "nl.gm0268.2i.2022.7".to_string(),
            title: "woo-verzoek over de aanleg van een fietspad langs de Waal bij Nijmegen-Oost"
                .to_string(),
            type_code: TypeCode::from("2i"),
            request_text: Some("verzoek om informatie".to_string()),
            decision_text: Some("gedeeltelijk openbaar".to_string()),
            files: vec![
                file("f1", "verzoek", "Titel 1", "verzoek.pdf", 1),
                file("f2", "besluit", "Titel 2", "", 3),
                file("f3", "inventaris", "", "", 2),
            ],
            ..Default::default()
        }
    }

    #[test]
    fn test_groups_in_fixed_order_without_empty_ones() {
        let detail = build_detail(&request_dossier(), "https://pid.wooverheid.nl/", Locale::Nl);
        let roles: Vec<FileRole> = detail.groups.iter().map(|g| g.role).collect();
        assert_eq!(roles, vec![FileRole::Request, FileRole::Decision, FileRole::Other]);

        assert_eq!(detail.groups[0].label, "Verzoek (1)");
        assert_eq!(detail.groups[0].text.as_deref(), Some("Verzoek om informatie"));
        assert_eq!(detail.groups[1].text.as_deref(), Some("Gedeeltelijk openbaar"));
        assert_eq!(detail.groups[2].text, None);
    }

    #[test]
    fn test_file_entries() {
        let detail = build_detail(&request_dossier(), "https://pid.wooverheid.nl/", Locale::Nl);
        let first = &detail.groups[0].files[0];
        assert_eq!(first.name, "verzoek.pdf");
        assert_eq!(first.format, "pdf");
        assert_eq!(first.pages, "1 pagina");
        assert_eq!(first.download_url, "https://pid.wooverheid.nl/f1");

        // Falls back to the title, then to the placeholder.
        assert_eq!(detail.groups[1].files[0].name, "Titel 2");
        assert_eq!(detail.groups[1].files[0].pages, "3 pagina's");
        assert_eq!(detail.groups[2].files[0].name, "Naamloos bestand");
    }

    #[test]
    fn test_header_fields_and_links() {
        let detail = build_detail(&request_dossier(), "https://pid.wooverheid.nl", Locale::Nl);
        assert_eq!(
            detail.page_title,
            "Dossier: woo-verzoek over de aanleg van een fietspad langs ..."
        );
        assert_eq!(detail.title.chars().next(), Some('W'));
        assert_eq!(detail.publisher, DEFAULT_PUBLISHER);
        assert_eq!(detail.topic, "Onbekend");
        assert_eq!(detail.page_count, "Onbekend");
        assert_eq!(detail.type_name, "Dossier na Woo/Wob-verzoek");
        assert_eq!(
            detail.links.view,
            "https://pid.wooverheid.nl/?pid=nl.gm0268.2i.2022.7"
        );
        assert_eq!(
            detail.links.download,
            "https://pid.wooverheid.nl/?pid=nl.gm0268.2i.2022.7&zip=true"
        );
    }

    #[test]
    fn test_non_request_dossier_uses_titles() {
        let mut dossier = request_dossier();
        dossier.type_code = TypeCode::from("2k");
        let detail = build_detail(&dossier, "https://pid.wooverheid.nl/", Locale::En);
        assert_eq!(detail.groups[0].files[0].name, "Titel 1");
        assert_eq!(detail.groups[0].label, "Request (1)");
    }
}
