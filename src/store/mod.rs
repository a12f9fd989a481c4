//! Record stores
//!
//! One module per record type, each pairing the document schema with its
//! collection operations. Stores hold a typed collection handle cloned from
//! the single client opened at startup; all durability and write mutual
//! exclusion is MongoDB's.

mod company;
mod registration;
mod student;

pub use company::{Company, CompanyStore, NewCompany};
pub use registration::{Registration, RegistrationStore};
pub use student::{NewStudent, Student, StudentStore};
