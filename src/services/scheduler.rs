use chrono::{DateTime, Datelike, Duration, Local, Timelike, Weekday};

use crate::services::report::ReportPeriod;

/// 管道任务标识
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskId {
    FetchNews,
    Sentiment,
    Report(ReportPeriod),
}

/// 任务节奏：固定间隔 或 每日定点
#[derive(Debug, Clone, Copy)]
pub enum Cadence {
    EveryMinutes(i64),
    DailyAt { hour: u32, minute: u32 },
}

struct TaskEntry {
    id: TaskId,
    cadence: Cadence,
    last_run: DateTime<Local>,
}

/// 显式任务表。due() 只依赖传入的 now 和表内 last_run 状态，
/// 不依赖真实时间流逝，可以在测试里拨表推进。
pub struct Schedule {
    entries: Vec<TaskEntry>,
}

impl Schedule {
    /// 默认任务表：新闻每1分钟，情绪每2分钟，午盘/收盘报告每日定点。
    /// 以 now 为基准：间隔任务从现在起算；定点任务当天已过点则顺延明天
    /// （启动时的首轮新闻/情绪由主流程显式触发，不走任务表）。
    pub fn standard(now: DateTime<Local>) -> Self {
        let entry = |id, cadence| TaskEntry {
            id,
            cadence,
            last_run: now,
        };
        Self {
            entries: vec![
                entry(TaskId::FetchNews, Cadence::EveryMinutes(1)),
                entry(TaskId::Sentiment, Cadence::EveryMinutes(2)),
                entry(
                    TaskId::Report(ReportPeriod::Midday),
                    Cadence::DailyAt { hour: 11, minute: 30 },
                ),
                entry(
                    TaskId::Report(ReportPeriod::Close),
                    Cadence::DailyAt { hour: 15, minute: 30 },
                ),
            ],
        }
    }

    /// 返回此刻到期的任务并推进 last_run。同一 tick 多个任务到期
    /// 则按表内顺序全部返回，由调用方串行执行。
    pub fn due(&mut self, now: DateTime<Local>) -> Vec<TaskId> {
        let mut due = Vec::new();
        for entry in &mut self.entries {
            if is_due(entry, now) {
                entry.last_run = now;
                due.push(entry.id);
            }
        }
        due
    }
}

fn is_due(entry: &TaskEntry, now: DateTime<Local>) -> bool {
    match entry.cadence {
        Cadence::EveryMinutes(minutes) => now - entry.last_run >= Duration::minutes(minutes),
        Cadence::DailyAt { hour, minute } => {
            let Some(fire_at) = now
                .date_naive()
                .and_hms_opt(hour, minute, 0)
                .and_then(|dt| dt.and_local_timezone(Local).earliest())
            else {
                return false;
            };
            now >= fire_at && entry.last_run < fire_at
        }
    }
}

/// 当前 A 股市场所处阶段描述（用于运行日志）
pub fn market_status(now: DateTime<Local>) -> &'static str {
    let weekday = now.weekday();
    if weekday == Weekday::Sat || weekday == Weekday::Sun {
        return "休市(周末)";
    }

    let time_val = now.hour() * 100 + now.minute();
    if time_val < 915 {
        "盘前"
    } else if time_val <= 925 {
        "竞价中"
    } else if time_val < 930 {
        "集合竞价结束"
    } else if time_val <= 1130 {
        "交易中(上午)"
    } else if time_val < 1300 {
        "午间休市"
    } else if time_val <= 1500 {
        "交易中(下午)"
    } else {
        "已收盘"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn ts(day: u32, h: u32, m: u32, s: u32) -> DateTime<Local> {
        Local.with_ymd_and_hms(2026, 8, day, h, m, s).unwrap()
    }

    #[test]
    fn test_nothing_due_at_construction() {
        let now = ts(7, 9, 0, 0);
        let mut schedule = Schedule::standard(now);
        assert!(schedule.due(now).is_empty());
    }

    #[test]
    fn test_interval_tasks_due_after_elapse() {
        let start = ts(7, 9, 0, 0);
        let mut schedule = Schedule::standard(start);

        // 1分钟后：只有新闻到期
        let due = schedule.due(ts(7, 9, 1, 0));
        assert_eq!(due, vec![TaskId::FetchNews]);

        // 再过1分钟：新闻与情绪同时到期，按表内顺序
        let due = schedule.due(ts(7, 9, 2, 0));
        assert_eq!(due, vec![TaskId::FetchNews, TaskId::Sentiment]);
    }

    #[test]
    fn test_interval_anchors_to_last_run() {
        let start = ts(7, 9, 0, 0);
        let mut schedule = Schedule::standard(start);

        // 执行晚点（9:01:30 才 tick 到），下一次从实际执行时刻起算
        assert_eq!(schedule.due(ts(7, 9, 1, 30)), vec![TaskId::FetchNews]);
        let due = schedule.due(ts(7, 9, 2, 0));
        // 距上次新闻执行仅 30 秒，不到期；情绪任务照常到期
        assert!(!due.contains(&TaskId::FetchNews));
        assert!(due.contains(&TaskId::Sentiment));
        assert!(schedule.due(ts(7, 9, 2, 30)).contains(&TaskId::FetchNews));
    }

    #[test]
    fn test_daily_task_fires_once_at_time() {
        let start = ts(7, 11, 0, 0);
        let mut schedule = Schedule::standard(start);

        // 11:29 未到点
        let due = schedule.due(ts(7, 11, 29, 0));
        assert!(!due.contains(&TaskId::Report(ReportPeriod::Midday)));

        // 11:30 到点
        let due = schedule.due(ts(7, 11, 30, 0));
        assert!(due.contains(&TaskId::Report(ReportPeriod::Midday)));

        // 同日不再触发
        let due = schedule.due(ts(7, 12, 0, 0));
        assert!(!due.contains(&TaskId::Report(ReportPeriod::Midday)));

        // 次日同一时点再次触发
        let due = schedule.due(ts(8, 11, 30, 0));
        assert!(due.contains(&TaskId::Report(ReportPeriod::Midday)));
    }

    #[test]
    fn test_daily_task_started_after_time_defers_to_next_day() {
        // 16:00 启动：收盘报告当天不补跑
        let start = ts(7, 16, 0, 0);
        let mut schedule = Schedule::standard(start);

        let due = schedule.due(ts(7, 16, 30, 0));
        assert!(!due.contains(&TaskId::Report(ReportPeriod::Close)));

        let due = schedule.due(ts(8, 15, 30, 0));
        assert!(due.contains(&TaskId::Report(ReportPeriod::Close)));
    }

    #[test]
    fn test_daily_task_late_tick_still_fires() {
        // 轮询被慢任务拖过点（11:47 才 tick 到）也要触发
        let start = ts(7, 9, 0, 0);
        let mut schedule = Schedule::standard(start);
        let due = schedule.due(ts(7, 11, 47, 0));
        assert!(due.contains(&TaskId::Report(ReportPeriod::Midday)));
    }

    #[test]
    fn test_market_status_phases() {
        assert_eq!(market_status(ts(7, 9, 0, 0)), "盘前");
        assert_eq!(market_status(ts(7, 9, 20, 0)), "竞价中");
        assert_eq!(market_status(ts(7, 10, 30, 0)), "交易中(上午)");
        assert_eq!(market_status(ts(7, 12, 0, 0)), "午间休市");
        assert_eq!(market_status(ts(7, 14, 0, 0)), "交易中(下午)");
        assert_eq!(market_status(ts(7, 16, 0, 0)), "已收盘");
        // 2026-08-08 是周六
        assert_eq!(market_status(ts(8, 10, 0, 0)), "休市(周末)");
    }
}
