// Copyright 2024 FastLabs Developers
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! The crate-level functions and macros against an installed default logger.
//!
//! Everything runs in one test since the default logger is shared by the whole process.

use mlog::Fields;
use mlog::Level;
use mlog::Logger;
use mlog::sink::Capture;
use mlog::sink::Discard;

#[test]
fn crate_level_functions_use_the_default_logger() {
    let capture = Capture::default();
    let logger = Logger::builder()
        .fields(Fields::LEVEL | Fields::FILE)
        .sink(capture.clone())
        .build()
        .unwrap();
    mlog::set_default_logger(logger).unwrap();

    let other = Logger::new(Discard::default(), Fields::NONE);
    let err = mlog::set_default_logger(other).unwrap_err();
    assert_eq!(err.message(), "mlog default logger has been already set up");

    assert_eq!(mlog::threshold(), Level::INFO);
    assert_eq!(mlog::fields(), Fields::LEVEL | Fields::FILE);

    mlog::in_testing("hidden").unwrap();
    let function_line = line!() + 1;
    mlog::in_production("visible").unwrap();

    mlog::set_threshold(Level::DEBUG);
    let macro_line = line!() + 1;
    mlog::in_testing!("{} + {} = {}", 1, 2, 3).unwrap();

    mlog::set_threshold(Level::new("bogus"));
    assert_eq!(mlog::threshold(), Level::DEBUG);

    mlog::set_fields(Fields::LEVEL);
    mlog::to_investigate("investigate").unwrap();
    mlog::page_me_now("page").unwrap();
    mlog::log(&Level::ERROR, format_args!("{}", "explicit")).unwrap();
    mlog::log!(Level::WARNING, "{}", "macro").unwrap();
    mlog::set_sinks(vec![]);

    assert_eq!(
        capture.lines(),
        vec![
            format!("[INFO] default_logger.rs:{function_line}: visible"),
            format!("[DEBUG] default_logger.rs:{macro_line}: 1 + 2 = 3"),
            "[WARNING] investigate".to_owned(),
            "[ERROR] page".to_owned(),
            "[ERROR] explicit".to_owned(),
            "[WARNING] macro".to_owned(),
            "[INFO] set_sinks: no destination provided".to_owned(),
        ]
    );

    let moved = Capture::default();
    mlog::set_sink(moved.clone());
    mlog::set_fields(Fields::NONE);
    mlog::in_production("moved").unwrap();
    mlog::flush().unwrap();
    assert_eq!(moved.contents(), "moved\n");
    assert_eq!(capture.lines().len(), 7);
}
