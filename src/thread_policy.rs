use clap::ValueEnum;
use strum_macros::Display;

/// Which `allThreads` values are accepted from a results file.
///
/// The current test plans step through powers of two. `Decades` matches the
/// older plans that ran 1/10/100/1000 threads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Display)]
#[strum(serialize_all = "kebab-case")]
pub enum ThreadPolicy {
    #[default]
    PowersOfTwo,
    Decades,
}

const POWERS_OF_TWO: [u32; 8] = [1, 2, 4, 8, 16, 32, 64, 128];
const DECADES: [u32; 4] = [1, 10, 100, 1000];

impl ThreadPolicy {
    pub fn allowed(self) -> &'static [u32] {
        match self {
            ThreadPolicy::PowersOfTwo => &POWERS_OF_TWO,
            ThreadPolicy::Decades => &DECADES,
        }
    }

    pub fn accepts(
        self,
        active_threads: u32,
    ) -> bool {
        self.allowed().contains(&active_threads)
    }
}
