//! Error channel effect

/// Line-oriented error output consumed by the invoking transport
///
/// The dispatcher writes at most one line per session, of the form
/// `"<FailureKind>: <detail>"`.
pub trait ErrorChannel {
    /// Write one message line
    fn write(&mut self, message: &str);
}

impl<T: ErrorChannel + ?Sized> ErrorChannel for &mut T {
    fn write(&mut self, message: &str) {
        (**self).write(message);
    }
}
