use {
    aoc2024::{Args, RunQuestions},
    clap::Parser,
};

fn main() {
    let args: Args = Args::parse();

    match args.day {
        10 => aoc2024::y2024::d10::Solution::run(&args),
        16 => aoc2024::y2024::d16::Solution::run(&args),
        18 => aoc2024::y2024::d18::Solution::run(&args),
        20 => aoc2024::y2024::d20::Solution::run(&args),
        day => eprintln!("No solver is registered for day {day}."),
    }
}
