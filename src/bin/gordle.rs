use std::{
    fs,
    io::{self, Read},
    process,
    time::Instant,
};

use clap::{Arg, ArgMatches, Command};
use image::Rgb;
use log::{error, info};
use rust_gordle::{save_png, CloudError, FontSizing, WordCloud};

fn cli() -> Command<'static> {
    Command::new("gordle")
        .about("Render the most frequent words of a text as a PNG word cloud")
        .arg(
            Arg::new("input")
                .help("Text file to read, stdin when omitted")
                .index(1),
        )
        .arg(
            Arg::new("output")
                .short('o')
                .long("output")
                .takes_value(true)
                .default_value("out.png"),
        )
        .arg(Arg::new("seed").long("seed").takes_value(true))
        .arg(
            Arg::new("palette-size")
                .long("palette-size")
                .takes_value(true),
        )
        .arg(
            Arg::new("fallback-color")
                .long("fallback-color")
                .help("Any CSS color, used when no palette can be generated")
                .takes_value(true),
        )
        .arg(
            Arg::new("min-size")
                .long("min-size")
                .takes_value(true)
                .requires("max-size"),
        )
        .arg(
            Arg::new("max-size")
                .long("max-size")
                .takes_value(true)
                .requires("min-size"),
        )
        .arg(Arg::new("verbose").short('v').long("verbose"))
}

fn parse<T: std::str::FromStr>(matches: &ArgMatches, name: &str) -> Result<Option<T>, String> {
    match matches.value_of(name) {
        Some(raw) => raw
            .parse()
            .map(Some)
            .map_err(|_| format!("invalid value for --{name}: {raw}")),
        None => Ok(None),
    }
}

fn configure(matches: &ArgMatches) -> Result<WordCloud, String> {
    let mut wordcloud = WordCloud::default();

    if let Some(seed) = parse::<u64>(matches, "seed")? {
        wordcloud = wordcloud.with_rng_seed(seed);
    }
    if let Some(size) = parse::<usize>(matches, "palette-size")? {
        wordcloud = wordcloud.with_palette_size(size);
    }
    if let Some(raw) = matches.value_of("fallback-color") {
        let color = csscolorparser::parse(raw).map_err(|err| format!("{raw}: {err}"))?;
        let [r, g, b, _] = color.to_rgba8();
        wordcloud = wordcloud.with_fallback_color(Rgb([r, g, b]));
    }
    if let (Some(min), Some(max)) = (
        parse::<f32>(matches, "min-size")?,
        parse::<f32>(matches, "max-size")?,
    ) {
        wordcloud = wordcloud.with_font_sizing(FontSizing::ByCount { min, max });
    }

    Ok(wordcloud)
}

fn read_input(matches: &ArgMatches) -> Result<String, CloudError> {
    match matches.value_of("input") {
        Some(path) => Ok(fs::read_to_string(path)?),
        None => {
            let mut text = String::new();
            io::stdin().read_to_string(&mut text)?;
            Ok(text)
        }
    }
}

pub fn main() {
    let matches = cli().get_matches();

    let level = if matches.is_present("verbose") {
        "debug"
    } else {
        "info"
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    let wordcloud = match configure(&matches) {
        Ok(wordcloud) => wordcloud,
        Err(err) => {
            error!("{err}");
            process::exit(2);
        }
    };

    let now = Instant::now();
    let result = read_input(&matches)
        .and_then(|text| wordcloud.generate_png(&text))
        .and_then(|bytes| {
            let output = matches.value_of("output").unwrap_or("out.png");
            save_png(&bytes, output)?;
            Ok(output.to_string())
        });

    match result {
        Ok(output) => info!("Generated {output} in {}ms", now.elapsed().as_millis()),
        Err(err) => {
            error!("{err}");
            process::exit(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{cli, configure};

    #[test]
    fn rejects_bad_values() {
        let matches = cli().get_matches_from(["gordle", "--seed", "x"]);
        assert!(configure(&matches).is_err());

        let matches = cli().get_matches_from(["gordle", "--fallback-color", "notacolor"]);
        assert!(configure(&matches).is_err());
    }

    #[test]
    fn accepts_css_colors_and_sizes() {
        let matches = cli().get_matches_from([
            "gordle",
            "--fallback-color",
            "rebeccapurple",
            "--min-size",
            "10",
            "--max-size",
            "40",
            "--palette-size",
            "0",
        ]);
        let placed = configure(&matches)
            .unwrap()
            .place_words("cat cat dog")
            .unwrap();

        assert!(placed.iter().all(|p| p.word.color.0 == [102, 51, 153]));
        assert_eq!(placed[0].word.size, 40.0);
        assert_eq!(placed[1].word.size, 10.0);
    }
}
