use clap::Arg;
use core_affinity::{get_core_ids, set_for_current};
use std::num::{NonZero, NonZeroUsize};

pub type LbResult<T> = Result<T, Box<dyn std::error::Error>>;

#[derive(Debug)]
pub struct Config {
    pub number_of_threads: NonZeroUsize,
    pub core_affinity: bool,
    pub max_steps: usize,
    pub batch_size: NonZeroUsize,
    pub write_data: Option<NonZeroUsize>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            number_of_threads: NonZero::new(1).unwrap(),
            core_affinity: false,
            max_steps: 10000,
            batch_size: NonZero::new(100).unwrap(),
            write_data: None,
        }
    }
}

impl Config {
    pub fn get_number_of_threads(&self) -> usize {
        usize::from(self.number_of_threads)
    }
}

pub fn get_args() -> LbResult<clap::ArgMatches> {
    let matches = clap::command!()
        .arg(
            Arg::new("number_of_threads")
                .short('n')
                .long("num-threads")
                .value_name("NTHREADS")
                .help("The number of threads used (min = 1)")
                .value_parser(clap::value_parser!(NonZeroUsize))
                .default_value("1"),
        )
        .arg(
            Arg::new("core_affinity")
                .long("affinity")
                .help("Set the core affinity")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("max_steps")
                .long("max-steps")
                .value_name("STEPS")
                .help("The total number of time steps")
                .value_parser(clap::value_parser!(usize))
                .default_value("10000"),
        )
        .arg(
            Arg::new("batch_size")
                .short('b')
                .long("batch-size")
                .value_name("STEPS")
                .help("The number of steps the obstacle force is averaged over (min = 1)")
                .value_parser(clap::value_parser!(NonZeroUsize))
                .default_value("100"),
        )
        .arg(
            Arg::new("write_data")
                .short('w')
                .long("write-data")
                .value_name("FREQUENCY")
                .help("The frequency which the macroscopic fields are written (min = 1)")
                .value_parser(clap::value_parser!(NonZeroUsize)),
        )
        .get_matches();
    Ok(matches)
}

pub fn parse_matches(matches: &clap::ArgMatches) -> LbResult<Config> {
    let number_of_threads = *matches
        .get_one::<NonZeroUsize>("number_of_threads")
        .expect("Has 1 as default");
    let core_affinity = matches.get_flag("core_affinity");
    let max_steps = *matches.get_one::<usize>("max_steps").expect("Has default");
    let batch_size = *matches
        .get_one::<NonZeroUsize>("batch_size")
        .expect("Has 100 as default");
    let write_data = matches.get_one::<NonZeroUsize>("write_data").copied();
    let cfg = Config {
        number_of_threads,
        core_affinity,
        max_steps,
        batch_size,
        write_data,
    };
    Ok(cfg)
}

pub fn init_global_pool(num_threads: usize, pin_all_cores: bool) {
    if pin_all_cores {
        let cores = get_core_ids().expect("list the system cores");
        rayon::ThreadPoolBuilder::new()
            .num_threads(num_threads)
            .start_handler(move |idx| {
                if pin_all_cores {
                    let core = cores[idx % cores.len()];
                    let _ = set_for_current(core);
                }
            })
            .build_global()
            .expect("global pool was already built?");
    } else {
        rayon::ThreadPoolBuilder::new()
            .num_threads(num_threads)
            .build_global()
            .expect("global pool was already built?");
    };
}
