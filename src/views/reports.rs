use std::fmt;
use std::str::FromStr;

use serde::Serialize;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum ReportPeriod {
    Week,
    Month,
    Quarter,
}

impl ReportPeriod {
    pub const ALL: [ReportPeriod; 3] = [ReportPeriod::Week, ReportPeriod::Month, ReportPeriod::Quarter];

    pub fn label(&self) -> &'static str {
        match self {
            ReportPeriod::Week => "This week",
            ReportPeriod::Month => "This month",
            ReportPeriod::Quarter => "This quarter",
        }
    }
}

impl fmt::Display for ReportPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ReportPeriod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "week" => Ok(ReportPeriod::Week),
            "month" => Ok(ReportPeriod::Month),
            "quarter" => Ok(ReportPeriod::Quarter),
            other => Err(format!("unknown report period: {}", other)),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HeadlineStats {
    pub deliveries_completed: u32,
    pub pending_deliveries: u32,
    pub damaged_goods: u32,
    pub success_rate: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DailyReport {
    pub date: &'static str,
    pub delivered: u32,
    pub damaged: u32,
    pub pending: u32,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentPerformance {
    pub name: &'static str,
    pub completed: u32,
    pub pending: u32,
    pub success_rate: u32,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportSnapshot {
    pub period: ReportPeriod,
    pub stats: HeadlineStats,
    pub daily: Vec<DailyReport>,
    pub agents: Vec<AgentPerformance>,
}

/// Reports are fixed figures; there is no reporting endpoint yet, so every
/// period shows the same snapshot.
pub fn snapshot(period: ReportPeriod) -> ReportSnapshot {
    ReportSnapshot {
        period,
        stats: HeadlineStats {
            deliveries_completed: 1247,
            pending_deliveries: 156,
            damaged_goods: 23,
            success_rate: 94.8,
        },
        daily: vec![
            DailyReport { date: "1/20/2024", delivered: 45, damaged: 2, pending: 12 },
            DailyReport { date: "1/19/2024", delivered: 52, damaged: 1, pending: 8 },
            DailyReport { date: "1/18/2024", delivered: 38, damaged: 3, pending: 15 },
        ],
        agents: vec![
            AgentPerformance { name: "Amit Singh", completed: 67, pending: 8, success_rate: 84 },
            AgentPerformance { name: "Suresh Kumar", completed: 52, pending: 12, success_rate: 87 },
            AgentPerformance { name: "Rajesh Patel", completed: 74, pending: 6, success_rate: 90 },
        ],
    }
}
