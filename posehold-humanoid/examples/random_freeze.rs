use anyhow::Result;
use clap::Parser;
use ndarray::{Array1, ArrayView1};
use posehold_core::{
    record::{AggregateRecorder, BufferedRecorder, LogRecorder, Record, RecordValue},
    util::rollout,
    Policy, Registry,
};
use posehold_humanoid::{register_environments, HumanoidConfig, HumanoidEnv, ENV_NAME};

/// Random policy with uniform actions in `[-scale, scale]`.
struct RandomPolicy {
    n_acts: usize,
    scale: f32,
}

impl Policy for RandomPolicy {
    fn sample(&mut self, _: ArrayView1<f32>) -> Array1<f32> {
        (0..self.n_acts)
            .map(|_| (fastrand::f32() * 2.0 - 1.0) * self.scale)
            .collect()
    }
}

/// Run random policies in the baby freeze environment
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Number of episodes
    #[arg(short, long, default_value_t = 3)]
    episodes: usize,

    /// Maximum steps per episode, the episode length of the config if not given
    #[arg(short, long)]
    max_steps: Option<usize>,

    /// Scale of random actions, 0 holds still
    #[arg(short, long, default_value_t = 0.1)]
    scale: f32,

    /// Environment config in YAML
    #[arg(short, long)]
    config: Option<String>,

    /// Random seed
    #[arg(long, default_value_t = 42)]
    seed: u64,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();
    fastrand::seed(args.seed);

    let mut registry = Registry::<HumanoidEnv>::new();
    register_environments(&mut registry);

    let config = match args.config.as_ref() {
        Some(path) => HumanoidConfig::load(path)?,
        None => registry.default_config(ENV_NAME)?,
    };
    let max_steps = args.max_steps.unwrap_or(config.episode_length);
    let env = registry.load(ENV_NAME, Some(config), None)?;

    let mut policy = RandomPolicy {
        n_acts: env.action_size(),
        scale: args.scale,
    };
    let mut summary = LogRecorder::new();

    for ix in 0..args.episodes {
        let mut recorder = BufferedRecorder::new();
        let episode_return = rollout(&*env, &mut policy, ix as u64, max_steps, &mut recorder)?;
        let steps = recorder.len();

        let mut record = recorder.into_storage().aggregate();
        record.merge_inplace(Record::from_slice(&[
            ("return", RecordValue::Scalar(episode_return)),
            ("steps", RecordValue::Scalar(steps as f32)),
        ]));
        summary.store(record);
        summary.flush(ix as i64);
    }

    Ok(())
}
