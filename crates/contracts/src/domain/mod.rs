pub mod a001_student;
pub mod a002_employee;
pub mod a003_loan;
pub mod a004_assessment;
