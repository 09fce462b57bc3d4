mod waitlist_email;
mod waitlist_entry;
pub use waitlist_email::is_valid_email;
pub use waitlist_email::WaitlistEmail;
pub use waitlist_entry::WaitlistEntry;
