//! Data module - TSV loading and cleaning

mod cleaner;
mod loader;

pub use cleaner::{CleanerError, CleaningReport, DataCleaner};
pub use loader::{DataLoader, Dataset, Datasets, LoaderError};

/// Column names shared by the loader, cleaner and reports.
pub mod columns {
    pub const COMPANY_ID: &str = "companiesId";
    pub const COMPANY_NAME: &str = "companiesName";
    pub const SECTOR_KEY: &str = "sectorKey";
    pub const EMPLOYEES: &str = "employeesName";

    pub const CONTACT_ID: &str = "contactsId";
    /// Contacts id header as exported, before header whitespace is stripped.
    pub const CONTACT_ID_RAW: &str = " contactsId";
    pub const CONTACT_NAME: &str = "contactsName";

    pub const DEAL_PRICE: &str = "dealsPrice";
    pub const DEAL_DATE: &str = "dealsDateCreated";

    pub const SECTOR: &str = "sector";

    pub const MONTH_YEAR: &str = "monthYear";
    pub const DEAL_PERCENT: &str = "dealsPercent";
}
