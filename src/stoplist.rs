/// Token stoplist: Latin words that pass the token scanner's shape checks
/// but are ordinary English words the source uses in running prose, not
/// morphemes being introduced. E.g. "able" appears constantly in suffix
/// explanations ("-able 表示能…的") without being the heading's subject.
///
/// Configuration data — extend here, not in the parser.
pub const TOKEN_STOPLIST: &[&str] = &["ability", "able", "ably", "year"];
