use ratatui::{prelude::*, widgets::*};

use crate::distribution::{Distribution, DistributionPoint, Species};
use crate::error::Result;
use crate::ui::components::chart::{render_distribution_chart, ChartData, ACID_COLOR, BASE_COLOR};
use crate::ui::components::live::{LiveRenderer, View};
use crate::ui::components::utils::split_vertical;
use crate::ui::input::{Key, KeySource};
use crate::ui::session::{drive, with_session, Flow, Interactive, UiOptions};
use crate::ui::styles::key_hints;

/// Full-screen diagram with a cursor that reads out the values under it.
pub struct ChartViewer {
    data: ChartData,
    points: Vec<DistributionPoint>,
    species: Species,
    cursor: usize,
}

impl ChartViewer {
    /// The cursor starts at the point closest to the pKA.
    pub fn new(distribution: &Distribution, species: &Species) -> Self {
        let cursor = distribution
            .points
            .iter()
            .enumerate()
            .min_by(|(_, a), (_, b)| {
                (a.ph - distribution.pka)
                    .abs()
                    .total_cmp(&(b.ph - distribution.pka).abs())
            })
            .map(|(index, _)| index)
            .unwrap_or(0);
        Self {
            data: ChartData {
                acid: distribution.acid_series(),
                base: distribution.base_series(),
                bounds: distribution.ph_bounds(),
            },
            points: distribution.points.clone(),
            species: species.clone(),
            cursor,
        }
    }

    pub fn cursor_point(&self) -> Option<&DistributionPoint> {
        self.points.get(self.cursor)
    }
}

impl Interactive for ChartViewer {
    type Output = ();
    type View = ChartView;

    fn view(&self) -> ChartView {
        ChartView {
            data: self.data.clone(),
            species: self.species.clone(),
            cursor: self.cursor_point().copied(),
        }
    }

    fn step(mut self, key: Key) -> Flow<Self, ()> {
        let last = self.points.len().saturating_sub(1);
        match key {
            Key::Left => self.cursor = self.cursor.saturating_sub(1),
            Key::Right => self.cursor = (self.cursor + 1).min(last),
            Key::Enter | Key::Escape => return Flow::Done(()),
            key if key.is_letter('q') => return Flow::Done(()),
            _ => {}
        }
        Flow::Continue(self)
    }
}

pub struct ChartView {
    data: ChartData,
    species: Species,
    cursor: Option<DistributionPoint>,
}

impl View for ChartView {
    fn render(&self, frame: &mut Frame<'_>) {
        let chunks = split_vertical(
            frame.size(),
            &[
                Constraint::Min(5),
                Constraint::Length(1),
                Constraint::Length(1),
            ],
        );
        render_distribution_chart(
            frame,
            chunks[0],
            &self.data,
            &self.species,
            self.cursor.as_ref(),
        );

        if let Some(point) = &self.cursor {
            let readout = Line::from(vec![
                Span::from(format!("pH: {:.1}   ", point.ph)).bold(),
                Span::styled(
                    format!("{}: {:.2}%   ", self.species.acid, point.acid),
                    Style::default().fg(ACID_COLOR),
                ),
                Span::styled(
                    format!("{}: {:.2}%", self.species.base, point.base),
                    Style::default().fg(BASE_COLOR),
                ),
            ]);
            frame.render_widget(Paragraph::new(readout), chunks[1]);
        }

        let hints = key_hints(&[("← →", "move cursor"), ("q", "close")]);
        frame.render_widget(Paragraph::new(hints), chunks[2]);
    }
}

pub fn run_chart_viewer<B: Backend, K: KeySource>(
    live: &mut LiveRenderer<B>,
    keys: &mut K,
    distribution: &Distribution,
    species: &Species,
) -> Result<()> {
    drive(live, keys, ChartViewer::new(distribution, species))
}

/// Show the diagram in the terminal until the user closes it.
pub fn show_chart(distribution: &Distribution, species: &Species, ui: &UiOptions) -> Result<()> {
    with_session(ui, |live, keys| run_chart_viewer(live, keys, distribution, species))
}
