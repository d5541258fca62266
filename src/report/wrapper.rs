use std::any::type_name;

use tracing::{error, info};

use super::output::ReportOutput;
use super::sink::{FileSink, ReportSink};

/// Suffix appended to the function name to build the default destination
pub const REPORT_SUFFIX: &str = "_report.json";

/// A report function callable with its arguments packed in a tuple.
///
/// Implemented for every `Fn` of up to four arguments, so plain functions
/// can be wrapped without adapters.
pub trait ReportFn<Args> {
    type Output;

    fn invoke(&self, args: Args) -> Self::Output;
}

macro_rules! impl_report_fn {
    ($($arg:ident),*) => {
        impl<Func, Out, $($arg,)*> ReportFn<($($arg,)*)> for Func
        where
            Func: Fn($($arg),*) -> Out,
        {
            type Output = Out;

            #[allow(non_snake_case)]
            fn invoke(&self, ($($arg,)*): ($($arg,)*)) -> Out {
                (self)($($arg),*)
            }
        }
    };
}

impl_report_fn!();
impl_report_fn!(A);
impl_report_fn!(A, B);
impl_report_fn!(A, B, C);
impl_report_fn!(A, B, C, D);

/// Last path segment of `F`'s type name, without generics or closure markers.
///
/// For a function item this is the function's own name, e.g.
/// `spending_by_weekday`.
pub fn report_name<F>() -> String {
    let full = type_name::<F>();
    let path = full.split('<').next().unwrap_or(full);
    path.rsplit("::")
        .find(|segment| !segment.is_empty() && !segment.starts_with('{'))
        .unwrap_or("report")
        .to_string()
}

/// Serializes `output` and writes it to `destination`.
///
/// Failures are logged and swallowed: persisting a report never changes what
/// the report returns.
pub fn persist_report<S, T>(sink: &S, destination: &str, output: &T)
where
    S: ReportSink + ?Sized,
    T: ReportOutput + ?Sized,
{
    let artifact = match output.artifact() {
        Some(Ok(artifact)) => artifact,
        Some(Err(e)) => {
            error!(destination, error = %e, "Error saving report");
            return;
        }
        None => return,
    };

    match sink.write(destination, &artifact) {
        Ok(()) => info!(destination, "Report saved"),
        Err(e) => error!(destination, error = %e, "Error saving report"),
    }
}

/// A report function whose every result is also written to a sink.
///
/// ```rust,ignore
/// use bank_analytics_rs::{Reported, spending_by_weekday, DateWindow};
///
/// let weekday = Reported::new(spending_by_weekday);
/// let rows = weekday.call((transactions.as_slice(), DateWindow::since(start)));
/// // rows are also in ./spending_by_weekday_report.json
/// ```
pub struct Reported<F, S = FileSink> {
    func: F,
    destination: String,
    sink: S,
}

impl<F> Reported<F, FileSink> {
    /// Wraps `func`, writing to `<name>_report.json` in the current directory.
    pub fn new(func: F) -> Self {
        Self {
            func,
            destination: format!("{}{}", report_name::<F>(), REPORT_SUFFIX),
            sink: FileSink::default(),
        }
    }
}

impl<F, S: ReportSink> Reported<F, S> {
    /// Overrides the default destination name.
    pub fn destination(mut self, destination: impl Into<String>) -> Self {
        self.destination = destination.into();
        self
    }

    pub fn with_sink<T: ReportSink>(self, sink: T) -> Reported<F, T> {
        Reported {
            func: self.func,
            destination: self.destination,
            sink,
        }
    }

    pub fn destination_name(&self) -> &str {
        &self.destination
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Runs the report, persists its result, and hands the result back as is.
    pub fn call<Args>(&self, args: Args) -> F::Output
    where
        F: ReportFn<Args>,
        F::Output: ReportOutput,
    {
        let output = self.func.invoke(args);
        persist_report(&self.sink, &self.destination, &output);
        output
    }
}
