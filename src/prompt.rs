use std::io::{self, BufRead, Write};

use crate::config::{ContentType, Format, FormatSelection, Granularity};
use crate::error::Result;

/// Line-oriented questions asked before a run. Each question repeats until
/// the answer is valid; end of input is an error.
pub struct Prompter<R, W> {
    input: R,
    out: W,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, out: W) -> Self {
        Prompter { input, out }
    }

    fn ask(&mut self, question: &str) -> Result<String> {
        write!(self.out, "{}", question)?;
        self.out.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(io::Error::new(io::ErrorKind::UnexpectedEof, "input closed").into());
        }
        Ok(line.trim().to_string())
    }

    fn warn(&mut self, msg: &str) -> Result<()> {
        writeln!(self.out, "\nWARNING: {}", msg)?;
        Ok(())
    }

    pub fn channels(&mut self) -> Result<Vec<String>> {
        loop {
            let line = self.ask("\nEnter the YouTube channel username to scrape (separated by commas): ")?;
            let channels = split_channels(&line);
            if !channels.is_empty() {
                return Ok(channels);
            }
            self.warn("No channel usernames provided. Please specify at least one channel to scrape.")?;
        }
    }

    pub fn content_type(&mut self) -> Result<ContentType> {
        loop {
            let answer = self.ask("\nPlease, choose what to scrape:\n\n1) Videos\n2) Streams\n3) Shorts\n\n")?;
            match answer.as_str() {
                "1" => return Ok(ContentType::Videos),
                "2" => return Ok(ContentType::Streams),
                "3" => return Ok(ContentType::Shorts),
                _ => self.warn("Invalid selection. Please try again.")?,
            }
        }
    }

    pub fn granularity(&mut self) -> Result<Granularity> {
        loop {
            let answer = self.ask(
                "\nWhat type of information would you like to scrape?\n\n\
                 1) Video Info (Detailed information for each video)\n\
                 2) Channel Info (Summary information for the channel)\n\n\
                 Enter the number of your choice: ",
            )?;
            match answer.as_str() {
                "1" => return Ok(Granularity::ItemDetail),
                "2" => return Ok(Granularity::ChannelSummary),
                _ => self.warn("Invalid choice. Please enter 1 or 2.")?,
            }
        }
    }

    /// Blank means no cap.
    pub fn max_count(&mut self, content: ContentType) -> Result<Option<usize>> {
        loop {
            let answer = self.ask(&format!(
                "\nEnter the maximum number of {} to scrape (or press Enter for all): ",
                content
            ))?;
            if answer.is_empty() {
                return Ok(None);
            }
            match answer.parse::<i64>() {
                Ok(n) if n > 0 => return Ok(Some(n as usize)),
                Ok(_) => self.warn("Please enter a positive number or press Enter for all.")?,
                Err(_) => self.warn("Invalid input. Please enter a positive number or press Enter for all.")?,
            }
        }
    }

    pub fn formats(&mut self) -> Result<FormatSelection> {
        loop {
            let answer = self.ask(
                "\nSelect the format of your choice to save the data:\n\n\
                 1) CSV format\n2) TXT format\n3) XLSX format\n4) JSON format\n\
                 5) All available formats\n\n",
            )?;
            match parse_format_choice(&answer) {
                Some(selection) => return Ok(selection),
                None => self.warn("Invalid format selection. Please try again.")?,
            }
        }
    }
}

/// Granularity fixed by flags, or `None` when it still has to be asked.
/// Only the videos tab offers a choice.
pub fn granularity_preset(content: ContentType, summary: bool, detail: bool) -> Option<Granularity> {
    if content != ContentType::Videos || detail {
        Some(Granularity::ItemDetail)
    } else if summary {
        Some(Granularity::ChannelSummary)
    } else {
        None
    }
}

pub fn split_channels(line: &str) -> Vec<String> {
    line.split(',')
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(str::to_string)
        .collect()
}

/// `1`..=`4` comma-separated, or `5` for every format.
pub fn parse_format_choice(answer: &str) -> Option<FormatSelection> {
    let mut picked = Vec::new();
    for choice in answer.split(',').map(str::trim) {
        match choice {
            "1" => picked.push(Format::Csv),
            "2" => picked.push(Format::Txt),
            "3" => picked.push(Format::Xlsx),
            "4" => picked.push(Format::Json),
            "5" => return Some(FormatSelection::All),
            _ => return None,
        }
    }
    Some(FormatSelection::Only(picked))
}
