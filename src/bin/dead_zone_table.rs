use clap::{ArgEnum, Parser};

use ftc_mechanisms::lift_util::{control_to_direction_with_curve, DeadZoneCurve};

#[derive(ArgEnum, Clone, Copy, Debug)]
enum CurveArg {
    Linear,
    Rescaled,
}

impl From<CurveArg> for DeadZoneCurve {
    fn from(curve: CurveArg) -> Self {
        match curve {
            CurveArg::Linear => DeadZoneCurve::Linear,
            CurveArg::Rescaled => DeadZoneCurve::Rescaled,
        }
    }
}

#[derive(Parser, Debug)]
#[clap(name = "dead_zone_table")]
struct Opts {
    #[clap(short, long, default_value = "0.1")]
    dead_zone: f64,

    #[clap(short, long, arg_enum, default_value = "linear")]
    curve: CurveArg,

    #[clap(short, long, default_value = "10")]
    steps: u32,
}

fn main() {
    let opts: Opts = Opts::parse();
    let curve = DeadZoneCurve::from(opts.curve);
    let steps = opts.steps.max(1);

    println!("down\tup\tpower");
    for i in 0..=steps {
        let up = f64::from(i) / f64::from(steps);
        println!("0.00\t{up:.2}\t{:+.3}", control_to_direction_with_curve(curve, opts.dead_zone, 0.0, up));
    }
    for i in 1..=steps {
        let down = f64::from(i) / f64::from(steps);
        println!("{down:.2}\t0.00\t{:+.3}", control_to_direction_with_curve(curve, opts.dead_zone, down, 0.0));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_curve_flag_parses_into_curve() {
        let opts = Opts::try_parse_from(["dead_zone_table", "--curve", "rescaled"]).unwrap();
        assert_eq!(DeadZoneCurve::from(opts.curve), DeadZoneCurve::Rescaled);
        let opts = Opts::try_parse_from(["dead_zone_table"]).unwrap();
        assert_eq!(DeadZoneCurve::from(opts.curve), DeadZoneCurve::Linear);
        assert!(Opts::try_parse_from(["dead_zone_table", "--curve", "cubic"]).is_err());
    }
}
