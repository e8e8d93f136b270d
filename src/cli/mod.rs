//! Line-oriented terminal front end for the login form and both signup
//! wizards.

pub mod prompt;
pub mod session;
pub mod signup;

pub use prompt::{Prompter, Reply};
pub use session::{run_login, run_logout, run_whoami};
pub use signup::{SignupEnd, run_signup};

use crate::notify::{Notifier, Toast, ToastVariant};

/// Prints toasts to stderr so they stay out of the prompt stream.
#[derive(Debug, Default)]
pub struct StderrNotifier;

impl Notifier for StderrNotifier {
    fn notify(&self, toast: Toast) {
        match toast.variant {
            ToastVariant::Destructive => eprintln!("✗ {}: {}", toast.title, toast.description),
            ToastVariant::Default => eprintln!("ℹ {}: {}", toast.title, toast.description),
        }
    }
}
