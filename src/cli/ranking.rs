//! taskhub ranking command.

use serde::Serialize;

use crate::board::Podium;
use crate::cli::Context;
use crate::clock::Clock;
use crate::error::Result;
use crate::model::RankingRow;
use crate::output::{emit_success, HumanOutput};
use crate::store::TaskStore;

#[derive(Debug, Serialize)]
pub(crate) struct RankingOutput {
    pub podium: Podium,
    pub rows: Vec<RankingRow>,
}

pub fn run(ctx: &Context) -> Result<()> {
    let (output, human) = ranking_view(&ctx.store);
    emit_success(ctx.output, "ranking", &output, Some(&human))
}

pub(crate) fn ranking_view<C: Clock>(store: &TaskStore<C>) -> (RankingOutput, HumanOutput) {
    let rows = store.ranking();
    let podium = Podium::from_rows(&rows);

    let mut human = HumanOutput::new("Contribution ranking");
    if let Some(first) = podium.first() {
        human.push_summary(
            "Leader",
            format!("{} ({} pts)", first.row.member_name, first.row.total_score),
        );
    }
    human.push_summary("Members", rows.len().to_string());
    human.push_section(
        "Leaderboard",
        rows.iter()
            .enumerate()
            .map(|(index, row)| {
                let role = store
                    .member(&row.member_id)
                    .map(|member| member.role.as_str())
                    .filter(|role| !role.is_empty());
                let name = match role {
                    Some(role) => format!("{} ({role})", row.member_name),
                    None => row.member_name.clone(),
                };
                format!(
                    "{}. {name} - {} pts, {} task(s)",
                    index + 1,
                    row.total_score,
                    row.completed_tasks_count
                )
            })
            .collect(),
    );

    (RankingOutput { podium, rows }, human)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::output::format_human;
    use crate::seed::Seed;
    use chrono::Utc;

    #[test]
    fn ranking_view_lists_every_member() {
        let now = Utc::now();
        let store =
            TaskStore::with_clock(Seed::demo(now), "m1", FixedClock::new(now)).expect("store");
        let (output, human) = ranking_view(&store);
        assert_eq!(output.rows.len(), 4);
        assert_eq!(output.podium.places.len(), 3);

        let text = format_human(&human);
        assert!(text.contains("- Leader: 佐藤 花子 (3 pts)"));
        assert!(text.contains("1. 佐藤 花子 (広報) - 3 pts, 1 task(s)"));
        assert!(text.contains("2. 田中 太郎 (代表) - 0 pts, 0 task(s)"));
    }
}
