pub fn mean_present(values: &[Option<f64>]) -> Option<f64> {
    let present = values.iter().flatten().copied().collect::<Vec<f64>>();
    mean(&present)
}

pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

pub fn population_std(values: &[f64]) -> Option<f64> {
    let avg = mean(values)?;
    let variance = values
        .iter()
        .map(|value| (value - avg) * (value - avg))
        .sum::<f64>()
        / values.len() as f64;
    Some(variance.sqrt())
}

pub fn average_ranks(values: &[f64]) -> Vec<f64> {
    let mut order = (0..values.len()).collect::<Vec<usize>>();
    order.sort_by(|left, right| values[*left].total_cmp(&values[*right]));

    let mut ranks = vec![0.0_f64; values.len()];
    let mut start = 0;
    while start < order.len() {
        let mut end = start + 1;
        while end < order.len() && values[order[end]] == values[order[start]] {
            end += 1;
        }
        let shared = (start + 1 + end) as f64 / 2.0;
        for index in &order[start..end] {
            ranks[*index] = shared;
        }
        start = end;
    }
    ranks
}

pub fn pearson(left: &[f64], right: &[f64]) -> Option<f64> {
    if left.len() != right.len() || left.len() < 2 {
        return None;
    }

    let left_mean = mean(left)?;
    let right_mean = mean(right)?;

    let mut covariance = 0.0_f64;
    let mut left_var = 0.0_f64;
    let mut right_var = 0.0_f64;
    for (l, r) in left.iter().zip(right) {
        let dl = l - left_mean;
        let dr = r - right_mean;
        covariance += dl * dr;
        left_var += dl * dl;
        right_var += dr * dr;
    }

    if left_var <= 0.0 || right_var <= 0.0 {
        return None;
    }
    Some((covariance / (left_var.sqrt() * right_var.sqrt())).clamp(-1.0, 1.0))
}

pub fn spearman(left: &[f64], right: &[f64]) -> Option<f64> {
    if left.len() != right.len() || left.len() < 2 {
        return None;
    }
    pearson(&average_ranks(left), &average_ranks(right))
}

pub fn cosine_similarity(left: &[f64], right: &[f64]) -> f64 {
    if left.len() != right.len() || left.is_empty() {
        return 0.0;
    }

    let dot = left.iter().zip(right).map(|(l, r)| l * r).sum::<f64>();
    let left_norm = left.iter().map(|value| value * value).sum::<f64>().sqrt();
    let right_norm = right.iter().map(|value| value * value).sum::<f64>().sqrt();

    if left_norm == 0.0 || right_norm == 0.0 {
        return 0.0;
    }
    dot / (left_norm * right_norm)
}

pub fn normalize(value: f64, min_value: f64, max_value: f64) -> f64 {
    if max_value - min_value == 0.0 {
        return 0.0;
    }
    (value - min_value) / (max_value - min_value)
}
