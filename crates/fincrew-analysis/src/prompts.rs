//! Persona and task text for the financial crews
//!
//! Task text uses `{name}` placeholders filled from
//! [`AnalysisInputs::to_params`](crate::AnalysisInputs::to_params).

pub mod persona {
    pub const DATA_ANALYST_GOAL: &str = "Monitor and analyze market data in real time to identify \
trends and anticipate market movements.";
    pub const DATA_ANALYST_BACKSTORY: &str = "A financial-markets specialist who relies on \
statistical modeling and machine learning. Their read of the data is the foundation every \
trading decision in the crew builds on.";

    pub const STRATEGY_DEVELOPER_GOAL: &str = "Design and test trading strategies grounded in \
the insights produced by the Data Analyst.";
    pub const STRATEGY_DEVELOPER_BACKSTORY: &str = "A quantitative strategist with a deep \
understanding of market structure. They compare competing approaches and keep the ones with \
the best balance of return and risk.";

    pub const EXECUTION_ADVISOR_GOAL: &str = "Recommend how and when approved strategies \
should be executed.";
    pub const EXECUTION_ADVISOR_BACKSTORY: &str = "An execution specialist focused on timing, \
price and the logistics of getting trades done efficiently while staying true to the \
strategy.";

    pub const RISK_ADVISOR_GOAL: &str = "Evaluate the risks of proposed trading activity and \
recommend safeguards.";
    pub const RISK_ADVISOR_BACKSTORY: &str = "A risk modeler who scrutinizes every proposed \
position, quantifies the exposure and makes sure the plan stays within the investor's risk \
tolerance.";

    pub const STOCK_SELECTION_GOAL: &str = "Select the stocks that best fit the investor's \
capital, horizon and risk parameters.";
    pub const STOCK_SELECTION_BACKSTORY: &str = "A veteran portfolio strategist who has managed \
money through several market cycles. They blend quantitative screens with judgment about \
market psychology to build resilient, benchmark-beating portfolios within the client's \
constraints.";

    pub const MARKET_RESEARCH_GOAL: &str = "Surface emerging opportunities and undervalued \
assets across global markets that match the investor's parameters.";
    pub const MARKET_RESEARCH_BACKSTORY: &str = "A research lead who combines alternative data, \
fundamental work and macroeconomic trend analysis to spot market inefficiencies before they \
show up in conventional metrics.";
}

pub mod task {
    pub const DATA_ANALYSIS: &str = "Continuously monitor and analyze market data for \
{analysis_target}. Use statistical modeling and machine learning to identify trends and \
predict market movements.";
    pub const DATA_ANALYSIS_OUTPUT: &str = "Insights and alerts about significant market \
opportunities or threats for {analysis_target}.";

    pub const STRATEGY_DEVELOPMENT: &str = "Develop and refine trading strategies based on the \
market insights gathered so far and the investor's risk tolerance ({risk_tolerance}). Take the \
trading preference into account ({trading_strategy_preference}).";
    pub const STRATEGY_DEVELOPMENT_OUTPUT: &str = "A set of candidate trading strategies for \
{analysis_target} that align with the investor's risk tolerance.";

    pub const EXECUTION_PLANNING: &str = "Analyze the approved strategies and determine the best \
execution approach for {analysis_target}, considering current market conditions and pricing.";
    pub const EXECUTION_PLANNING_OUTPUT: &str = "Detailed execution plans describing how and \
when to trade {analysis_target}.";

    pub const RISK_ASSESSMENT: &str = "Evaluate the risks of the proposed strategies and \
execution plans for {analysis_target}. Analyze the potential risks in detail and propose \
mitigations.";
    pub const RISK_ASSESSMENT_OUTPUT: &str = "A comprehensive risk report with the potential \
risks and mitigation recommendations for {analysis_target}.";

    pub const MARKET_RESEARCH: &str = "Analyze the market across all sectors to find investment \
opportunities that fit the investor ({initial_capital} capital, {investment_timeframe} horizon, \
{risk_tolerance} risk tolerance). Cover:

1. Current market conditions and sector performance
2. Sectors positioned to outperform in the current economic cycle
3. Catalysts that could drive exceptional performance
4. Emerging trends not yet priced in
5. Institutional money flows
6. Stocks with favorable risk/reward for these parameters
7. Headwinds and tailwinds by sector
8. Global macroeconomic factors";
    pub const MARKET_RESEARCH_OUTPUT: &str = "A market intelligence briefing with:

1. Current market conditions and sector positioning
2. High-potential sectors for the investor's horizon
3. 10-15 preliminary stock candidates
4. Key performance drivers for each candidate
5. Fit of each candidate with the investor's parameters
6. Risk factors that could affect performance
7. Entry timing considerations";

    pub const STOCK_SELECTION: &str = "Pick the 3-5 stocks best suited to the investor \
({initial_capital} capital, {investment_timeframe} horizon, {risk_tolerance} risk tolerance) \
under current market conditions. Weigh:

1. Fundamental strength and financial health
2. Technical indicators and momentum
3. Competitive position
4. Macroeconomic trends and sector rotation
5. Valuation relative to growth
6. Liquidity relative to the invested capital
7. Behavior in comparable market conditions
8. Management quality and capital allocation

Justify every pick with evidence.";
    pub const STOCK_SELECTION_OUTPUT: &str = "A portfolio recommendation with:

1. 3-5 stocks and the rationale for each
2. Why each fits the investor's horizon and risk profile
3. Allocation percentages
4. Entry strategy with price points and timing
5. Expected return and volatility
6. Key risks per position and their mitigation
7. Holding timeline with review milestones";
}
