pub mod korbit;
