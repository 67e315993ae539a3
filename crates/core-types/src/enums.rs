use serde::{Deserialize, Serialize};
use std::fmt;

/// The sector a holding is classified under.
///
/// Parsing never fails: any label that is missing or not recognised folds
/// into `Other`, so grouping by sector is always total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Sector {
    CommunicationServices,
    ConsumerDiscretionary,
    ConsumerStaples,
    Energy,
    Financials,
    Healthcare,
    Industrials,
    Materials,
    RealEstate,
    Technology,
    Utilities,
    #[default]
    Other,
}

impl Sector {
    pub const ALL: [Sector; 12] = [
        Sector::CommunicationServices,
        Sector::ConsumerDiscretionary,
        Sector::ConsumerStaples,
        Sector::Energy,
        Sector::Financials,
        Sector::Healthcare,
        Sector::Industrials,
        Sector::Materials,
        Sector::RealEstate,
        Sector::Technology,
        Sector::Utilities,
        Sector::Other,
    ];

    /// Maps a free-form sector label onto a known sector.
    ///
    /// Accepts the dashboard's abbreviated labels as well as the long-form
    /// names used by most data vendors. Matching ignores case and surrounding
    /// whitespace.
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_ascii_lowercase().as_str() {
            "comm. serv." | "communication services" | "communications" | "telecommunications" => {
                Sector::CommunicationServices
            }
            "con. disc." | "consumer discretionary" | "consumer cyclical" => {
                Sector::ConsumerDiscretionary
            }
            "con. sta." | "consumer staples" | "consumer defensive" => Sector::ConsumerStaples,
            "energy" => Sector::Energy,
            "financials" | "financial services" | "financial" => Sector::Financials,
            "healthcare" | "health care" => Sector::Healthcare,
            "industrials" => Sector::Industrials,
            "materials" | "basic materials" => Sector::Materials,
            "real estate" => Sector::RealEstate,
            "technology" | "information technology" => Sector::Technology,
            "utilities" => Sector::Utilities,
            _ => Sector::Other,
        }
    }

    /// The short label shown in charts and tables.
    pub fn label(&self) -> &'static str {
        match self {
            Sector::CommunicationServices => "Comm. Serv.",
            Sector::ConsumerDiscretionary => "Con. Disc.",
            Sector::ConsumerStaples => "Con. Sta.",
            Sector::Energy => "Energy",
            Sector::Financials => "Financials",
            Sector::Healthcare => "Healthcare",
            Sector::Industrials => "Industrials",
            Sector::Materials => "Materials",
            Sector::RealEstate => "Real Estate",
            Sector::Technology => "Technology",
            Sector::Utilities => "Utilities",
            Sector::Other => "Other",
        }
    }
}

impl From<String> for Sector {
    fn from(label: String) -> Self {
        Sector::from_label(&label)
    }
}

impl From<&str> for Sector {
    fn from(label: &str) -> Self {
        Sector::from_label(label)
    }
}

impl From<Sector> for String {
    fn from(sector: Sector) -> Self {
        sector.label().to_string()
    }
}

impl fmt::Display for Sector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
