mod crud;
mod kits;
mod offline;
mod operations;
mod triage;
