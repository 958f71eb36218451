//! Default banner art for the home screen and the startup transcript.

use crate::output::OutputLine;

const DEFAULT_BANNER: &[&str] = &[
    "  ████████╗███████╗██████╗ ███╗   ███╗███████╗ ██████╗ ██╗     ██╗ ██████╗ ",
    "  ╚══██╔══╝██╔════╝██╔══██╗████╗ ████║██╔════╝██╔═══██╗██║     ██║██╔═══██╗",
    "     ██║   █████╗  ██████╔╝██╔████╔██║█████╗  ██║   ██║██║     ██║██║   ██║",
    "     ██║   ██╔══╝  ██╔══██╗██║╚██╔╝██║██╔══╝  ██║   ██║██║     ██║██║   ██║",
    "     ██║   ███████╗██║  ██║██║ ╚═╝ ██║██║     ╚██████╔╝███████╗██║╚██████╔╝",
    "     ╚═╝   ╚══════╝╚═╝  ╚═╝╚═╝     ╚═╝╚═╝      ╚═════╝ ╚══════╝╚═╝ ╚═════╝ ",
    "                                                                           ",
];

pub fn banner_lines() -> Vec<OutputLine> {
    DEFAULT_BANNER
        .iter()
        .map(|line| OutputLine::Art((*line).to_string()))
        .collect()
}
