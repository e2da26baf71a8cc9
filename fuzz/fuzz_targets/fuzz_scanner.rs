#![no_main]
use core::convert::Infallible;

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use streamscan::{
    ReadOutcome, ScanError, Scanner, ScannerOptions, SliceSource, Source, SplitStrategy,
};

#[derive(Debug, Arbitrary)]
enum Strategy {
    Bytes,
    CodePoints,
    Words,
    Lines,
}

impl Strategy {
    fn build(&self) -> SplitStrategy {
        match self {
            Strategy::Bytes => SplitStrategy::Bytes,
            Strategy::CodePoints => SplitStrategy::CodePoints,
            Strategy::Words => SplitStrategy::Words,
            Strategy::Lines => SplitStrategy::Lines,
        }
    }
}

#[derive(Debug, Arbitrary)]
struct Input {
    strategy: Strategy,
    /// Read sizes, cycled; zero is an empty read.
    sizes: Vec<u8>,
    max_token_size: u16,
    data: Vec<u8>,
}

struct Chunked<'a> {
    data: &'a [u8],
    sizes: Vec<usize>,
    next: usize,
}

impl Source for Chunked<'_> {
    type Error = Infallible;

    fn read(&mut self, buf: &mut [u8]) -> ReadOutcome<Infallible> {
        if self.data.is_empty() {
            return ReadOutcome::end(0);
        }
        let size = self.sizes[self.next % self.sizes.len()];
        self.next += 1;
        let n = size.min(buf.len()).min(self.data.len());
        buf[..n].copy_from_slice(&self.data[..n]);
        self.data = &self.data[n..];
        ReadOutcome::more(n)
    }
}

fn collect<S: Source>(scanner: &mut Scanner<S>) -> Vec<Vec<u8>> {
    let mut tokens = Vec::new();
    while let Some(token) = scanner.next_token() {
        tokens.push(token.to_vec());
    }
    tokens
}

fn scan(input: Input) {
    let max_token_size = usize::from(input.max_token_size).max(1);
    let options = ScannerOptions {
        max_token_size,
        initial_buffer_size: 16,
        ..ScannerOptions::default()
    };

    let mut sizes: Vec<usize> = input.sizes.iter().take(64).map(|&s| usize::from(s)).collect();
    if sizes.iter().all(|&s| s == 0) {
        sizes.push(1);
    }

    let mut whole = Scanner::with_strategy_options(
        SliceSource::new(&input.data),
        input.strategy.build(),
        options,
    );
    let mut chunked = Scanner::with_strategy_options(
        Chunked {
            data: &input.data,
            sizes,
            next: 0,
        },
        input.strategy.build(),
        options,
    );

    let whole_tokens = collect(&mut whole);
    let chunked_tokens = collect(&mut chunked);
    for token in whole_tokens.iter().chain(&chunked_tokens) {
        assert!(token.len() <= max_token_size);
    }

    match (whole.last_error(), chunked.last_error()) {
        (None, None) => {
            assert_eq!(whole_tokens, chunked_tokens);
            if matches!(input.strategy, Strategy::Bytes | Strategy::CodePoints) {
                assert_eq!(whole_tokens.concat(), input.data);
            }
        }
        (Some(ScanError::TokenTooLong), _) | (_, Some(ScanError::TokenTooLong)) => {
            // Where the limit is hit depends on how much each read delivered.
        }
        (whole, chunked) => panic!("unexpected errors {whole:?} / {chunked:?}"),
    }
}

fuzz_target!(|input: Input| scan(input));
