/// Page identifiers assigned by the host CMS.
pub type PageId = i64;
