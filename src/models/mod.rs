//! Data models for Librarium

pub mod book;
pub mod fee;
pub mod fields;
pub mod librarian;
pub mod loan;
pub mod student;

// Re-export commonly used types
pub use book::{Book, NewBook};
pub use fee::{FeeEntry, FeeRecord, StudentWithFee};
pub use librarian::{Librarian, LibrarianClaims, LibrarianProfile};
pub use loan::{LoanDetails, LoanRecord, LoanStatus, NewLoan};
pub use student::{Membership, Student};
